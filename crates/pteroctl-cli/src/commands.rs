//! Command-line parsing and execution.

use anyhow::{bail, Context, Result};
use pteroctl_core::{NewUser, PanelClient, User, UserId, UserUpdate};

use crate::output;

pub const USAGE: &str = "\
Usage: pteroctl [--json] <command>

Commands:
  login <panel-url>                 Store an application API token for a panel
  logout                            Remove the stored token
  users list
  users get <id>
  users get-external <external-id>
  users create <email> <username> <first-name> <last-name>
               [--password P] [--language L] [--external-id X] [--root-admin]
  users update <id> [--email E] [--username U] [--first-name F] [--last-name L]
               [--password P] [--language L] [--external-id X] [--root-admin true|false]
  users delete <id>

Environment:
  PTERODACTYL_URL, PTERODACTYL_TOKEN override stored settings.
  RUST_LOG controls log verbosity (default: warn).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { panel_url: String },
    Logout,
    ListUsers,
    GetUser(UserId),
    GetUserByExternalId(String),
    CreateUser(NewUser),
    UpdateUser(UserId, UserUpdate),
    DeleteUser(UserId),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub json: bool,
}

impl Invocation {
    pub fn parse(args: &[String]) -> Result<Self> {
        let (args, json) = split_json_switch(args);

        let command = match args.as_slice() {
            [] | ["help"] | ["--help"] | ["-h"] => Command::Help,
            ["login", url] => Command::Login {
                panel_url: url.to_string(),
            },
            ["logout"] => Command::Logout,
            ["users", "list"] => Command::ListUsers,
            ["users", "get", id] => Command::GetUser(parse_id(id)?),
            ["users", "get-external", id] => Command::GetUserByExternalId(id.to_string()),
            ["users", "create", email, username, first, last, rest @ ..] => {
                Command::CreateUser(parse_new_user(email, username, first, last, rest)?)
            }
            ["users", "update", id, rest @ ..] => {
                Command::UpdateUser(parse_id(id)?, parse_update(rest)?)
            }
            ["users", "delete", id] => Command::DeleteUser(parse_id(id)?),
            _ => bail!("Unrecognized command. Run `pteroctl help` for usage."),
        };

        Ok(Self { command, json })
    }
}

/// Remove `--json` switches. A `--json` directly after a value-taking
/// option is that option's value and is kept.
fn split_json_switch(args: &[String]) -> (Vec<&str>, bool) {
    let mut kept: Vec<&str> = Vec::with_capacity(args.len());
    let mut json = false;
    for arg in args.iter().map(String::as_str) {
        let is_value = kept
            .last()
            .is_some_and(|prev| prev.starts_with("--") && !matches!(*prev, "--root-admin" | "--help"));
        if arg == "--json" && !is_value {
            json = true;
        } else {
            kept.push(arg);
        }
    }
    (kept, json)
}

fn parse_id(raw: &str) -> Result<UserId> {
    raw.parse::<UserId>()
        .with_context(|| format!("Invalid user id {:?}", raw))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => bail!("Expected true or false, got {:?}", raw),
    }
}

/// Split `--flag value` pairs. `--root-admin` may appear without a value
/// when `bare_root_admin` is set.
fn parse_flags<'a>(rest: &[&'a str], bare_root_admin: bool) -> Result<Vec<(&'a str, &'a str)>> {
    let mut flags = Vec::new();
    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        if !flag.starts_with("--") {
            bail!("Unexpected argument {:?}", flag);
        }
        if bare_root_admin && *flag == "--root-admin" {
            flags.push((*flag, "true"));
            continue;
        }
        let value = iter
            .next()
            .with_context(|| format!("{} needs a value", flag))?;
        flags.push((*flag, *value));
    }
    Ok(flags)
}

fn parse_new_user(email: &str, username: &str, first: &str, last: &str, rest: &[&str]) -> Result<NewUser> {
    let mut draft = NewUser::new(email, username, first, last);
    for (flag, value) in parse_flags(rest, true)? {
        draft = match flag {
            "--password" => draft.password(value),
            "--language" => draft.language(value),
            "--external-id" => draft.external_id(value),
            "--root-admin" => draft.root_admin(parse_bool(value)?),
            other => bail!("Unknown option {} for users create", other),
        };
    }
    Ok(draft)
}

fn parse_update(rest: &[&str]) -> Result<UserUpdate> {
    let mut update = UserUpdate::default();
    for (flag, value) in parse_flags(rest, false)? {
        let value = value.to_string();
        match flag {
            "--email" => update.email = Some(value),
            "--username" => update.username = Some(value),
            "--first-name" => update.first_name = Some(value),
            "--last-name" => update.last_name = Some(value),
            "--password" => update.password = Some(value),
            "--language" => update.language = Some(value),
            "--external-id" => update.external_id = Some(value),
            "--root-admin" => update.root_admin = Some(parse_bool(&value)?),
            other => bail!("Unknown option {} for users update", other),
        }
    }
    Ok(update)
}

/// Run a user command against the panel and print the result.
pub async fn run_users(client: &PanelClient, command: Command, json: bool) -> Result<()> {
    match command {
        Command::ListUsers => {
            let users = client.list_users().await?;
            output::print_users(&users, json)?;
        }
        Command::GetUser(id) => {
            print_lookup(client.get_user(id).await?, json, &format!("id {}", id))?;
        }
        Command::GetUserByExternalId(external_id) => {
            let user = client.get_user_by_external_id(&external_id).await?;
            print_lookup(user, json, &format!("external id {:?}", external_id))?;
        }
        Command::CreateUser(draft) => {
            let id = client.create_user(&draft).await?;
            output::print_created(id, json)?;
        }
        Command::UpdateUser(id, update) => {
            let user = client.update_user(id, &update).await?;
            output::print_user(&user, json)?;
        }
        Command::DeleteUser(id) => {
            client.delete_user(id).await?;
            if !json {
                println!("Deleted user {}", id);
            }
        }
        other => bail!("{:?} is not a users command", other),
    }
    Ok(())
}

fn print_lookup(user: Option<User>, json: bool, key: &str) -> Result<()> {
    match user {
        Some(user) => output::print_user(&user, json),
        None => bail!("No user with {}", key),
    }
}
