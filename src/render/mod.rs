/// Placeholder styles and the parameterized render result.
pub mod params;
/// Tree-to-SQL rendering for nodes, groups and leaves.
pub mod sql;
/// Operator and condition lookup tables.
pub mod tables;
/// Per-field value validators.
pub mod validators;

pub use params::{ParameterizedSql, Placeholder};
pub use sql::format_value;
pub use tables::{ConditionTable, OperatorTable};
pub use validators::{ValidatorLoadError, ValidatorRegistry, ValidatorSpec};

/// What to do with a group whose condition is not in the condition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionPolicy {
    /// Fail with `InvalidRule`.
    #[default]
    Strict,
    /// Join the children with an empty separator and log a warning.
    Legacy,
}

/// Everything a render call reads besides the tree itself.
///
/// Build it once, then share it by reference; rendering never mutates it.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    operators: OperatorTable,
    conditions: ConditionTable,
    validators: ValidatorRegistry,
    condition_policy: ConditionPolicy,
}

impl RenderConfig {
    /// Standard tables, no validators, strict conditions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the operator table.
    #[must_use]
    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }

    /// Replace the condition table.
    #[must_use]
    pub fn with_conditions(mut self, conditions: ConditionTable) -> Self {
        self.conditions = conditions;
        self
    }

    /// Replace the validator registry.
    #[must_use]
    pub fn with_validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    /// Set the unknown-condition policy.
    #[must_use]
    pub fn with_condition_policy(mut self, policy: ConditionPolicy) -> Self {
        self.condition_policy = policy;
        self
    }

    /// Operator table in use.
    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Condition table in use.
    pub fn conditions(&self) -> &ConditionTable {
        &self.conditions
    }

    /// Validator registry in use.
    pub fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Mutable access to the validators while the config is being built.
    pub fn validators_mut(&mut self) -> &mut ValidatorRegistry {
        &mut self.validators
    }

    /// Unknown-condition policy in use.
    pub fn condition_policy(&self) -> ConditionPolicy {
        self.condition_policy
    }
}
