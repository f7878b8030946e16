// Error codes reported alongside topology errors

pub mod document {
    pub const READ_FAILED: &str = "DOCUMENT_1001";
    pub const PARSE_FAILED: &str = "DOCUMENT_1002";
    pub const UNRECOGNIZED_KEY: &str = "DOCUMENT_1003";
}

pub mod certificate {
    pub const INVALID_TYPE: &str = "CERT_2001";
    pub const UNKNOWN: &str = "CERT_2002";
}

pub mod hierarchy {
    pub const SELF_SIGNED_WITH_ISSUER: &str = "HIERARCHY_3001";
    pub const MISSING_ISSUER: &str = "HIERARCHY_3002";
    pub const ISSUER_NOT_AUTHORITY: &str = "HIERARCHY_3003";
    pub const ISSUER_CYCLE: &str = "HIERARCHY_3004";
}
