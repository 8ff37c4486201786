use dinebot_core::catalog::RestaurantCatalog;
use dinebot_core::config::{AppConfig, ConfigError, LoadOptions};
use serde::Serialize;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()), &RestaurantCatalog::sample());
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(
    loaded: Result<AppConfig, ConfigError>,
    catalog: &RestaurantCatalog,
) -> DoctorReport {
    let mut checks = Vec::new();

    match loaded {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm_credential(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_credential",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }
    checks.push(check_fallback_catalog(catalog));

    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let warned = checks.iter().any(|check| check.status == CheckStatus::Warn);
    let (overall_status, summary) = if failed {
        (CheckStatus::Fail, "doctor: one or more readiness checks failed")
    } else if warned {
        (CheckStatus::Warn, "doctor: ready, replies will be degraded")
    } else {
        (CheckStatus::Pass, "doctor: all readiness checks passed")
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

fn check_llm_credential(config: &AppConfig) -> DoctorCheck {
    if config.llm.has_credential() {
        DoctorCheck {
            name: "llm_credential",
            status: CheckStatus::Pass,
            details: format!("credential configured for `{}`", config.llm.model),
        }
    } else {
        DoctorCheck {
            name: "llm_credential",
            status: CheckStatus::Warn,
            details: "no credential set (DINEBOT_LLM_API_KEY or HF_API_KEY); model calls are skipped"
                .to_string(),
        }
    }
}

fn check_fallback_catalog(catalog: &RestaurantCatalog) -> DoctorCheck {
    if catalog.is_empty() {
        DoctorCheck {
            name: "fallback_catalog",
            status: CheckStatus::Fail,
            details: "built-in restaurant catalog is empty".to_string(),
        }
    } else {
        DoctorCheck {
            name: "fallback_catalog",
            status: CheckStatus::Pass,
            details: format!("{} built-in restaurants available", catalog.len()),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use dinebot_core::catalog::RestaurantCatalog;
    use dinebot_core::config::{AppConfig, ConfigError};

    use super::{build_report, render_human, CheckStatus};

    #[test]
    fn missing_credential_is_a_warning_not_a_failure() {
        let mut config = AppConfig::default();
        config.llm.api_key = None;

        let report = build_report(Ok(config), &RestaurantCatalog::sample());

        assert_eq!(report.overall_status, CheckStatus::Warn);
        assert_eq!(report.checks[1].name, "llm_credential");
        assert_eq!(report.checks[1].status, CheckStatus::Warn);
        assert_eq!(report.checks[2].status, CheckStatus::Pass);
    }

    #[test]
    fn configured_credential_passes_every_check() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("hf_test".to_string().into());

        let report = build_report(Ok(config), &RestaurantCatalog::sample());

        assert_eq!(report.overall_status, CheckStatus::Pass);
        assert!(render_human(&report).contains("- [ok] fallback_catalog: 5 built-in restaurants"));
    }

    #[test]
    fn config_failure_skips_credential_check() {
        let report = build_report(
            Err(ConfigError::Validation("geocoder.base_url must be http(s)".to_string())),
            &RestaurantCatalog::new(Vec::new()),
        );

        assert_eq!(report.overall_status, CheckStatus::Fail);
        let statuses: Vec<_> = report.checks.iter().map(|check| check.status).collect();
        assert_eq!(statuses, vec![CheckStatus::Fail, CheckStatus::Skipped, CheckStatus::Fail]);
    }
}
