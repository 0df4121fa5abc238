//! Study-On billing check.
//!
//! Loads configuration, connects to billing and prints the course catalogue
//! as an anonymous visitor would see it. Exits non-zero if billing cannot be
//! reached.

use std::sync::Arc;

use study_on::adapters::HttpBillingClient;
use study_on::application::{ListCatalogHandler, ListCatalogQuery};
use study_on::config::{init_tracing, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    tracing::info!(
        base_url = %config.billing.base_url,
        timeout_secs = config.billing.request_timeout_secs,
        "Starting billing check"
    );

    let client = HttpBillingClient::from_config(&config.billing)?;
    let catalog = ListCatalogHandler::new(Arc::new(client));

    let entries = catalog.handle(ListCatalogQuery::default()).await?;
    for entry in &entries {
        tracing::info!(
            course_code = %entry.course.code,
            course_type = %entry.course.course_type,
            label = %entry.label(),
            "Course"
        );
    }
    tracing::info!(courses = entries.len(), "Billing is reachable");

    Ok(())
}
