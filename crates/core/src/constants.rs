/// Constants used throughout the cloudenv codebase
// Placeholder tags
pub const PARAMETER_TAG: &str = "{aws-ssm}";
pub const SECRET_TAG: &str = "{aws-sm}";

// Parameter store limits
pub const MAX_PARAMETER_BATCH: usize = 10;
pub const PARAMETER_ARN_FIELDS: usize = 6;
pub const PARAMETER_RESOURCE_TYPE: &str = "parameter";

// Secret worker pool
pub const DEFAULT_SECRET_CONCURRENCY: usize = 5;

// Environment variable names
pub const CLOUDENV_CONCURRENCY_VAR: &str = "CLOUDENV_CONCURRENCY";
pub const CLOUDENV_LOG_VAR: &str = "CLOUDENV_LOG";
pub const PATH_VAR: &str = "PATH";

// Default log filter, quiet unless something goes wrong
pub const DEFAULT_LOG_FILTER: &str = "warn";
