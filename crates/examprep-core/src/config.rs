//! Exam configuration: domain table, quotas, passing threshold, duration.
//!
//! The defaults reproduce the CCISO blueprint. Loading from disk is left to
//! the caller; this module only describes and validates the values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::MAX_DOMAIN;

/// One domain of the exam blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Domain number in `1..=5`.
    pub number: u8,
    /// Display name.
    pub name: String,
    /// Questions drawn from this domain for a practice exam.
    pub quota: usize,
}

/// How many practice exam questions a domain contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuota {
    pub domain: u8,
    pub count: usize,
}

/// Top-level exam configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Domains in the order the assembler visits them.
    #[serde(default = "default_domains")]
    pub domains: Vec<DomainConfig>,
    /// Minimum percentage that passes.
    #[serde(default = "default_passing_percentage")]
    pub passing_percentage: f64,
    /// Practice exam length in minutes.
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    /// Remaining time below which the timer shows a warning.
    #[serde(default = "default_low_time_warning")]
    pub low_time_warning_secs: u64,
    /// Questions offered by default when starting a study session.
    #[serde(default = "default_study_count")]
    pub default_study_count: usize,
}

fn default_domains() -> Vec<DomainConfig> {
    [
        (1, "Governance, Risk, and Compliance", 32),
        (2, "Information Security Controls and Audit Management", 30),
        (3, "Security Program Management and Operations", 32),
        (4, "Information Security Core Competencies", 29),
        (5, "Strategic Planning, Finance, Procurement, and Vendor Management", 29),
    ]
    .into_iter()
    .map(|(number, name, quota)| DomainConfig {
        number,
        name: name.to_string(),
        quota,
    })
    .collect()
}

fn default_passing_percentage() -> f64 {
    80.0
}

fn default_duration_minutes() -> u32 {
    150
}

fn default_low_time_warning() -> u64 {
    600
}

fn default_study_count() -> usize {
    10
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            passing_percentage: default_passing_percentage(),
            duration_minutes: default_duration_minutes(),
            low_time_warning_secs: default_low_time_warning(),
            default_study_count: default_study_count(),
        }
    }
}

impl ExamConfig {
    /// Quotas in assembly order.
    pub fn quota_table(&self) -> Vec<DomainQuota> {
        self.domains
            .iter()
            .map(|d| DomainQuota {
                domain: d.number,
                count: d.quota,
            })
            .collect()
    }

    /// Nominal practice exam length.
    pub fn total_questions(&self) -> usize {
        self.domains.iter().map(|d| d.quota).sum()
    }

    /// Display name of a domain, if configured.
    pub fn domain_name(&self, number: u8) -> Option<&str> {
        self.domains
            .iter()
            .find(|d| d.number == number)
            .map(|d| d.name.as_str())
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domains.is_empty() {
            return Err(ConfigError::EmptyQuotaTable);
        }

        let mut seen = HashSet::new();
        for domain in &self.domains {
            if !(1..=MAX_DOMAIN).contains(&domain.number) {
                return Err(ConfigError::InvalidDomain(domain.number));
            }
            if !seen.insert(domain.number) {
                return Err(ConfigError::DuplicateDomain(domain.number));
            }
        }

        if self.total_questions() == 0 {
            return Err(ConfigError::ZeroTotal);
        }
        if self.duration_minutes == 0 {
            return Err(ConfigError::NonPositiveDuration);
        }
        if !(self.passing_percentage > 0.0 && self.passing_percentage <= 100.0) {
            return Err(ConfigError::PassingPercentageOutOfRange(
                self.passing_percentage,
            ));
        }
        Ok(())
    }
}
