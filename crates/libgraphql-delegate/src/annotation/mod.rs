mod delegation_annotation;
mod delegation_config;
mod delegation_config_builder;

pub use delegation_annotation::DelegationAnnotation;
pub use delegation_annotation::FieldDelegation;
pub use delegation_config::DelegationConfig;
pub use delegation_config_builder::DelegationConfigBuildError;
pub use delegation_config_builder::DelegationConfigBuilder;
pub use delegation_config_builder::DEFAULT_DIRECTIVE_NAME;
