//! Appointment booking
//!
//! Validation and submission of wellness-appointment requests. Validation
//! collects every field issue in one pass so the form can highlight all
//! problems at once; submission only runs against a request that already
//! passed validation.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationErrors};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Offered appointment services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    GeneralWellnessCheck,
    NutritionConsultation,
    PhysicalTherapy,
    MentalHealthCounseling,
    MassageTherapy,
    Acupuncture,
    ChiropracticCare,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::GeneralWellnessCheck,
        Service::NutritionConsultation,
        Service::PhysicalTherapy,
        Service::MentalHealthCounseling,
        Service::MassageTherapy,
        Service::Acupuncture,
        Service::ChiropracticCare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::GeneralWellnessCheck => "General Wellness Check",
            Service::NutritionConsultation => "Nutrition Consultation",
            Service::PhysicalTherapy => "Physical Therapy",
            Service::MentalHealthCounseling => "Mental Health Counseling",
            Service::MassageTherapy => "Massage Therapy",
            Service::Acupuncture => "Acupuncture",
            Service::ChiropracticCare => "Chiropractic Care",
        }
    }
}

/// Bookable time slots, hourly from 9 AM to 5 PM with noon off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    NineAm,
    TenAm,
    ElevenAm,
    OnePm,
    TwoPm,
    ThreePm,
    FourPm,
    FivePm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::NineAm,
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::OnePm,
        TimeSlot::TwoPm,
        TimeSlot::ThreePm,
        TimeSlot::FourPm,
        TimeSlot::FivePm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::NineAm => "09:00 AM",
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::OnePm => "01:00 PM",
            TimeSlot::TwoPm => "02:00 PM",
            TimeSlot::ThreePm => "03:00 PM",
            TimeSlot::FourPm => "04:00 PM",
            TimeSlot::FivePm => "05:00 PM",
        }
    }
}

/// A filled-in appointment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: Option<Service>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// Checks every field, reporting all issues at once.
    ///
    /// `today` comes from the caller so validation stays deterministic.
    /// Phone numbers accept separators and parentheses; after stripping
    /// them exactly ten digits must remain. Past dates are rejected,
    /// today is allowed.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.email.trim().is_empty() {
            errors.push("email", "email is required");
        } else if !EMAIL_RE.is_match(self.email.trim()) {
            errors.push("email", "email address is invalid");
        }
        if self.phone.trim().is_empty() {
            errors.push("phone", "phone number is required");
        } else {
            let digits: String = self
                .phone
                .chars()
                .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
                .collect();
            if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
                errors.push("phone", "phone number must have exactly 10 digits");
            }
        }
        if self.service.is_none() {
            errors.push("service", "please select a service");
        }
        match self.date {
            None => errors.push("date", "please select a date"),
            Some(date) if date < today => {
                errors.push("date", "date must not be in the past");
            }
            Some(_) => {}
        }
        if self.time.is_none() {
            errors.push("time", "please select a time slot");
        }

        errors.into_result()
    }

    /// Validates and accepts the request.
    ///
    /// There is no scheduling backend; an accepted request is logged and
    /// handed back to the host for display.
    pub fn submit(self, today: NaiveDate) -> Result<AppointmentRequest, CoreError> {
        self.validate(today)?;
        log::info!(
            "appointment requested: {} for {} on {} at {}",
            self.name,
            self.service.map_or("?", |s| s.as_str()),
            self.date.map_or_else(|| "?".to_string(), |d| d.to_string()),
            self.time.map_or("?", |t| t.as_str()),
        );
        Ok(self)
    }
}
