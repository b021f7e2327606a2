/// Collections exposed under `/api/application`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    /// Server eggs and nests. Not exposed by this client yet.
    Nests,
}

impl Resource {
    /// Path segment below `/api/application`.
    pub fn segment(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Nests => "nests",
        }
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, Resource::Users)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segment())
    }
}
