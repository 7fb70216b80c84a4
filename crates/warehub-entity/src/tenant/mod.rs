//! Tenant-level settings consumed read-only by the pipeline.

pub mod branding;
pub mod settings;

pub use branding::BrandingSettings;
pub use settings::TenantSettings;
