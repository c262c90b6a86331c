//! Device input validation
//!
//! Field-level checks for create and update payloads, plus id derivation.
//! All violations are collected so clients can fix every field at once.

use super::model::{DeviceCreateInput, DeviceUpdateInput, RACK_UNITS};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Ids that collide with static routes under `/devices/`
pub const RESERVED_IDS: &[&str] = &["live"];

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON key of the offending field
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

/// Collection of validation failures for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Single-error shorthand
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// True if no failures were recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded failures
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// True if any failure concerns `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Derive a device id from its name
///
/// Lowercases, collapses every run of non `[a-z0-9]` characters into a single
/// hyphen, and strips leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Validate a create payload
pub fn validate_create(input: &DeviceCreateInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_required(&mut errors, "name", &input.name);
    if !input.name.trim().is_empty() {
        let slug = slugify(&input.name);
        if slug.is_empty() {
            errors.add("name", "must contain at least one letter or digit");
        } else if RESERVED_IDS.contains(&slug.as_str()) {
            errors.add("name", format!("derives the reserved id \"{}\"", slug));
        }
    }
    check_required(&mut errors, "type", &input.device_type);
    check_required(&mut errors, "os", &input.os);
    check_latitude(&mut errors, input.lat);
    check_longitude(&mut errors, input.lng);
    if let Some(url) = &input.url {
        check_url(&mut errors, url);
    }
    check_rack(&mut errors, input.rack_position, input.rack_height);

    errors.into_result()
}

/// Validate the provided fields of an update payload
///
/// Rack placement is checked only against the fields present here; the store
/// re-checks the merged record.
pub fn validate_update(input: &DeviceUpdateInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(name) = &input.name {
        check_required(&mut errors, "name", name);
    }
    if let Some(device_type) = &input.device_type {
        check_required(&mut errors, "type", device_type);
    }
    if let Some(os) = &input.os {
        check_required(&mut errors, "os", os);
    }
    if let Some(lat) = input.lat {
        check_latitude(&mut errors, lat);
    }
    if let Some(lng) = input.lng {
        check_longitude(&mut errors, lng);
    }
    if let Some(url) = &input.url {
        check_url(&mut errors, url);
    }
    check_rack(&mut errors, input.rack_position, input.rack_height);

    errors.into_result()
}

/// Validate a rack placement that is already merged onto a record
pub fn validate_rack_placement(
    position: Option<u32>,
    height: Option<u32>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_rack(&mut errors, position, height);
    errors.into_result()
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "cannot be empty");
    }
}

fn check_latitude(errors: &mut ValidationErrors, lat: f64) {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        errors.add("lat", "must be between -90 and 90");
    }
}

fn check_longitude(errors: &mut ValidationErrors, lng: f64) {
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        errors.add("lng", "must be between -180 and 180");
    }
}

// Empty string is accepted and means "no URL"
fn check_url(errors: &mut ValidationErrors, url: &str) {
    if url.is_empty() {
        return;
    }
    if Url::parse(url).is_err() {
        errors.add("url", "must be a valid absolute URL");
    }
}

fn check_rack(errors: &mut ValidationErrors, position: Option<u32>, height: Option<u32>) {
    let position_ok = match position {
        Some(p) if !(1..=RACK_UNITS).contains(&p) => {
            errors.add(
                "rackPosition",
                format!("must be between 1 and {}", RACK_UNITS),
            );
            false
        }
        _ => true,
    };
    let height_ok = match height {
        Some(h) if !(1..=RACK_UNITS).contains(&h) => {
            errors.add("rackHeight", format!("must be between 1 and {}", RACK_UNITS));
            false
        }
        _ => true,
    };

    if let (Some(p), Some(h), true, true) = (position, height, position_ok, height_ok) {
        if p + h - 1 > RACK_UNITS {
            errors.add(
                "rackHeight",
                format!("device extends past the top of the {}U rack", RACK_UNITS),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> DeviceCreateInput {
        DeviceCreateInput {
            name: "Tower NAS".to_string(),
            device_type: "Storage".to_string(),
            os: "TrueNAS".to_string(),
            lat: 40.7,
            lng: -73.9,
            monitor_id: None,
            url: None,
            rack_position: None,
            rack_height: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tower NAS"), "tower-nas");
        assert_eq!(slugify("  --Proxmox  Node #2!! "), "proxmox-node-2");
        assert_eq!(slugify("UniFi/Dream_Machine"), "unifi-dream-machine");
        assert_eq!(slugify("pi4"), "pi4");
        assert_eq!(slugify("Café Server"), "caf-server");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_valid_create_input() {
        assert!(validate_create(&valid_input()).is_ok());
    }

    #[test]
    fn test_create_collects_all_errors() {
        let mut input = valid_input();
        input.name = "  ".to_string();
        input.os = String::new();
        input.lat = 91.0;
        input.lng = -180.5;

        let errors = validate_create(&input).unwrap_err();
        assert_eq!(errors.errors().len(), 4);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("os"));
        assert!(errors.has_field("lat"));
        assert!(errors.has_field("lng"));
    }

    #[test]
    fn test_coordinate_bounds_are_inclusive() {
        let mut input = valid_input();
        input.lat = -90.0;
        input.lng = 180.0;
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn test_name_without_alphanumerics_is_rejected() {
        let mut input = valid_input();
        input.name = "***".to_string();
        let errors = validate_create(&input).unwrap_err();
        assert!(errors.has_field("name"));
    }

    #[test]
    fn test_name_deriving_reserved_id_is_rejected() {
        let mut input = valid_input();
        for name in ["Live", "LIVE!", "-live-"] {
            input.name = name.to_string();
            let errors = validate_create(&input).unwrap_err();
            assert!(errors.has_field("name"), "{}", name);
        }

        input.name = "Live Server".to_string();
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn test_url_rules() {
        let mut input = valid_input();
        input.url = Some(String::new());
        assert!(validate_create(&input).is_ok());

        input.url = Some("https://proxmox.lan:8006".to_string());
        assert!(validate_create(&input).is_ok());

        input.url = Some("proxmox.lan".to_string());
        let errors = validate_create(&input).unwrap_err();
        assert!(errors.has_field("url"));
    }

    #[test]
    fn test_rack_rules() {
        assert!(validate_rack_placement(Some(1), Some(42)).is_ok());
        assert!(validate_rack_placement(Some(40), Some(3)).is_ok());
        assert!(validate_rack_placement(None, Some(4)).is_ok());

        assert!(validate_rack_placement(Some(0), None).is_err());
        assert!(validate_rack_placement(Some(43), None).is_err());
        assert!(validate_rack_placement(Some(5), Some(0)).is_err());

        let errors = validate_rack_placement(Some(41), Some(3)).unwrap_err();
        assert!(errors.has_field("rackHeight"));
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        assert!(validate_update(&DeviceUpdateInput::default()).is_ok());

        let update = DeviceUpdateInput {
            name: Some(String::new()),
            lat: Some(-95.0),
            ..Default::default()
        };
        let errors = validate_update(&update).unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("lat"));
        assert!(!errors.has_field("type"));
    }

    #[test]
    fn test_display_joins_messages() {
        let errors = ValidationErrors::single("lat", "must be between -90 and 90");
        assert_eq!(errors.to_string(), "lat: must be between -90 and 90");
    }
}
