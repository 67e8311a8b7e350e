use std::fmt;

/// One function of the demo pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    ProcessData,
    ValidateInput,
    CheckFormat,
    DeepValidation,
    TransformData,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::ProcessData,
        Stage::ValidateInput,
        Stage::CheckFormat,
        Stage::DeepValidation,
        Stage::TransformData,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stage::ProcessData => "process_data",
            Stage::ValidateInput => "validate_input",
            Stage::CheckFormat => "check_format",
            Stage::DeepValidation => "deep_validation",
            Stage::TransformData => "transform_data",
        }
    }

    /// Name as a method of `DemoPipeline`, matching what translators extract
    #[must_use]
    pub fn qualified_name(self) -> String {
        format!("DemoPipeline::{}", self.name())
    }

    /// Progress line printed when the stage starts
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Stage::ProcessData => "Processing data...",
            Stage::ValidateInput => "Validating input...",
            Stage::CheckFormat => "Checking format...",
            Stage::DeepValidation => "Performing deep validation...",
            Stage::TransformData => "Transforming data...",
        }
    }

    /// Stages this stage calls directly, in call order
    #[must_use]
    pub fn direct_callees(self) -> &'static [Stage] {
        match self {
            Stage::ProcessData => &[Stage::ValidateInput, Stage::TransformData],
            Stage::ValidateInput => &[Stage::CheckFormat],
            Stage::CheckFormat => &[Stage::DeepValidation],
            Stage::DeepValidation | Stage::TransformData => &[],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_deep_validation_and_transform_are_leaves() {
        let leaves: Vec<Stage> = Stage::ALL
            .into_iter()
            .filter(|s| s.direct_callees().is_empty())
            .collect();
        assert_eq!(leaves, vec![Stage::DeepValidation, Stage::TransformData]);
    }

    #[test]
    fn test_every_stage_but_entry_has_one_caller() {
        for stage in Stage::ALL.into_iter().skip(1) {
            let callers = Stage::ALL
                .into_iter()
                .filter(|s| s.direct_callees().contains(&stage))
                .count();
            assert_eq!(callers, 1, "{stage}");
        }
    }
}
