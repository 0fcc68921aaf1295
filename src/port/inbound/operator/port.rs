//! Unified operator capability surface for inbound adapters.

use super::asset::AssetOperator;
use super::configuration::ConfigurationOperator;
use super::report::ReportOperator;
use super::runtime::RuntimeOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: AssetOperator + ConfigurationOperator + ReportOperator + RuntimeOperator {}

impl<T> OperatorPort for T where
    T: AssetOperator + ConfigurationOperator + ReportOperator + RuntimeOperator
{
}
