//! Vendor stall applications.
//!
//! Unlike seats, vendor capacity is not grid-backed: an application moves from
//! `pending` to either `approved` or `rejected` and stays there. Only approved
//! applications consume one of the event's vendor slots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::{AllocationError, AllocationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business details a vendor submits with an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorApplication {
    pub status: ApplicationStatus,
    /// When the application was submitted.
    pub time: String,
    #[serde(flatten)]
    pub form: ApplicationForm,
    /// Note left by the admin when deciding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Applications for one event, keyed by vendor username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorApplications {
    total_slots: usize,
    #[serde(default)]
    applications: BTreeMap<String, VendorApplication>,
}

impl VendorApplications {
    pub fn new(total_slots: usize) -> Self {
        Self {
            total_slots,
            applications: BTreeMap::new(),
        }
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// Changes the slot count. Already approved vendors keep their slots even
    /// if that leaves the event over capacity.
    pub fn set_total_slots(&mut self, total_slots: usize) {
        self.total_slots = total_slots;
    }

    pub fn approved_count(&self) -> usize {
        self.applications
            .values()
            .filter(|app| app.status == ApplicationStatus::Approved)
            .count()
    }

    pub fn available_slots(&self) -> usize {
        self.total_slots.saturating_sub(self.approved_count())
    }

    pub fn get(&self, vendor: &str) -> Option<&VendorApplication> {
        self.applications.get(vendor)
    }

    pub fn status(&self, vendor: &str) -> Option<ApplicationStatus> {
        self.get(vendor).map(|app| app.status)
    }

    pub fn all(&self) -> impl Iterator<Item = (&String, &VendorApplication)> {
        self.applications.iter()
    }

    pub fn pending(&self) -> impl Iterator<Item = (&String, &VendorApplication)> {
        self.applications
            .iter()
            .filter(|(_, app)| app.status == ApplicationStatus::Pending)
    }

    /// Files a pending application for `vendor`.
    pub fn apply(
        &mut self,
        vendor: &str,
        form: ApplicationForm,
        timestamp: impl Into<String>,
    ) -> AllocationResult<&VendorApplication> {
        if let Some(existing) = self.applications.get(vendor) {
            return Err(AllocationError::AlreadyApplied {
                vendor: vendor.to_string(),
                status: existing.status,
            });
        }
        if self.available_slots() == 0 {
            return Err(AllocationError::CapacityExhausted {
                total: self.total_slots,
            });
        }

        let application = self
            .applications
            .entry(vendor.to_string())
            .or_insert(VendorApplication {
                status: ApplicationStatus::Pending,
                time: timestamp.into(),
                form,
                message: None,
            });
        Ok(application)
    }

    pub fn approve(&mut self, vendor: &str, message: Option<String>) -> AllocationResult<()> {
        self.pending_application(vendor)?;
        if self.available_slots() == 0 {
            return Err(AllocationError::CapacityExhausted {
                total: self.total_slots,
            });
        }
        self.decide(vendor, ApplicationStatus::Approved, message)
    }

    pub fn reject(&mut self, vendor: &str, message: Option<String>) -> AllocationResult<()> {
        self.pending_application(vendor)?;
        self.decide(vendor, ApplicationStatus::Rejected, message)
    }

    fn pending_application(&self, vendor: &str) -> AllocationResult<&VendorApplication> {
        let application = self
            .applications
            .get(vendor)
            .ok_or_else(|| AllocationError::ApplicationNotFound {
                vendor: vendor.to_string(),
            })?;
        if application.status != ApplicationStatus::Pending {
            return Err(AllocationError::AlreadyDecided {
                vendor: vendor.to_string(),
                status: application.status,
            });
        }
        Ok(application)
    }

    fn decide(
        &mut self,
        vendor: &str,
        status: ApplicationStatus,
        message: Option<String>,
    ) -> AllocationResult<()> {
        let application = self
            .applications
            .get_mut(vendor)
            .ok_or_else(|| AllocationError::ApplicationNotFound {
                vendor: vendor.to_string(),
            })?;
        application.status = status;
        application.message = message.filter(|m| !m.trim().is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> ApplicationForm {
        ApplicationForm {
            business_name: name.to_string(),
            business_type: "food".to_string(),
            description: "churros".to_string(),
        }
    }

    #[test]
    fn approval_consumes_a_slot() {
        let mut vendors = VendorApplications::new(2);

        let app = vendors.apply("v1", form("Churro Hut"), "2025-01-15 10:00:00").unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(vendors.available_slots(), 2);

        vendors.approve("v1", None).unwrap();
        assert_eq!(vendors.available_slots(), 1);

        assert_eq!(
            vendors.apply("v1", form("Churro Hut"), "later").unwrap_err(),
            AllocationError::AlreadyApplied {
                vendor: "v1".into(),
                status: ApplicationStatus::Approved,
            }
        );
    }

    #[test]
    fn rejected_and_pending_do_not_count() {
        let mut vendors = VendorApplications::new(1);
        vendors.apply("v1", form("a"), "t").unwrap();
        vendors.apply("v2", form("b"), "t").unwrap();
        vendors.reject("v2", Some("no space for generators".into())).unwrap();

        assert_eq!(vendors.available_slots(), 1);
        assert_eq!(vendors.pending().count(), 1);
        assert_eq!(
            vendors.get("v2").unwrap().message.as_deref(),
            Some("no space for generators")
        );
    }

    #[test]
    fn decisions_are_terminal() {
        let mut vendors = VendorApplications::new(3);
        vendors.apply("v1", form("a"), "t").unwrap();
        vendors.reject("v1", None).unwrap();

        assert_eq!(
            vendors.approve("v1", None),
            Err(AllocationError::AlreadyDecided {
                vendor: "v1".into(),
                status: ApplicationStatus::Rejected,
            })
        );
        assert_eq!(vendors.status("v1"), Some(ApplicationStatus::Rejected));
    }

    #[test]
    fn full_event_refuses_applications_and_approvals() {
        let mut vendors = VendorApplications::new(1);
        vendors.apply("v1", form("a"), "t").unwrap();
        vendors.apply("v2", form("b"), "t").unwrap();
        vendors.approve("v1", None).unwrap();

        assert_eq!(
            vendors.approve("v2", None),
            Err(AllocationError::CapacityExhausted { total: 1 })
        );
        assert_eq!(vendors.status("v2"), Some(ApplicationStatus::Pending));
        assert!(matches!(
            vendors.apply("v3", form("c"), "t"),
            Err(AllocationError::CapacityExhausted { .. })
        ));
    }

    #[test]
    fn unknown_vendor_cannot_be_decided() {
        let mut vendors = VendorApplications::new(1);
        assert!(matches!(
            vendors.reject("ghost", None),
            Err(AllocationError::ApplicationNotFound { .. })
        ));
    }

    #[test]
    fn shrinking_slots_never_underflows() {
        let mut vendors = VendorApplications::new(2);
        vendors.apply("v1", form("a"), "t").unwrap();
        vendors.apply("v2", form("b"), "t").unwrap();
        vendors.approve("v1", None).unwrap();
        vendors.approve("v2", None).unwrap();

        vendors.set_total_slots(1);
        assert_eq!(vendors.available_slots(), 0);
    }

    #[test]
    fn serializes_flat_application_fields() {
        let mut vendors = VendorApplications::new(1);
        vendors.apply("v1", form("Churro Hut"), "2025-01-15 10:00:00").unwrap();

        let json = serde_json::to_value(&vendors).unwrap();
        assert_eq!(json["total_slots"], 1);
        assert_eq!(json["applications"]["v1"]["status"], "pending");
        assert_eq!(json["applications"]["v1"]["business_name"], "Churro Hut");
        assert!(json["applications"]["v1"].get("message").is_none());

        let restored: VendorApplications = serde_json::from_value(json).unwrap();
        assert_eq!(restored, vendors);
    }
}
