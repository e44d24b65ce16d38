use crate::error::ApibenchError;
use crate::http::TargetConfig;
use crate::plan::model::BenchPlan;

/// Validate a [`BenchPlan`] and return a list of validation errors.
///
/// An empty `Vec` means the plan is valid. Unknown HTTP methods are not
/// reported here: the runner skips those repetitions at run time.
pub fn validate_plan(plan: &BenchPlan) -> Vec<ApibenchError> {
    let mut errors = Vec::new();

    if plan.urls.is_empty() {
        errors.push(ApibenchError::Validation(
            "Plan must list at least one target under 'urls'".to_string(),
        ));
    }

    if plan.timeout_secs == Some(0) {
        errors.push(ApibenchError::Validation(
            "timeout_secs must be at least 1".to_string(),
        ));
    }

    for (index, target) in plan.urls.iter().enumerate() {
        errors.extend(validate_target(index, target));
    }

    errors
}

fn validate_target(index: usize, target: &TargetConfig) -> Vec<ApibenchError> {
    let mut errors = Vec::new();

    if target.tag.trim().is_empty() {
        errors.push(ApibenchError::Validation(format!(
            "Target #{}: tag must not be empty",
            index + 1
        )));
    }

    let url = target.url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(ApibenchError::Validation(format!(
            "Target '{}': URL must start with http:// or https:// (got: {})",
            target.tag, target.url
        )));
    }

    errors
}
