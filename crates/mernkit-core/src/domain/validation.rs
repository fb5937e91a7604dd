use crate::domain::{
    entities::{ProjectConfig, ProvisioningPlan},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_project_config(config: &ProjectConfig) -> Result<(), DomainError> {
        config.validate()
    }

    pub fn validate_plan(plan: &ProvisioningPlan) -> Result<(), DomainError> {
        plan.validate()
    }
}
