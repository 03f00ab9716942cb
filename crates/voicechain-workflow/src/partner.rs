//! Legal partners offered at the consultation step.

use serde::{Deserialize, Serialize};

use crate::error::WorkflowResult;

const DEMO_PARTNERS: &str = include_str!("../data/legal_partners.json");

/// A law firm contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalPartner {
    pub id: String,
    pub name: String,
    pub firm: String,
    pub specialization: String,
    pub location: String,
    /// Client rating out of 5.
    pub rating: f32,
    pub consultation_fee: String,
    pub hourly_rate: String,
    #[serde(default)]
    pub languages: Vec<String>,
    pub available: bool,
}

/// The built-in partner roster, in display order.
pub fn demo_partners() -> WorkflowResult<Vec<LegalPartner>> {
    Ok(serde_json::from_str(DEMO_PARTNERS)?)
}

/// Partners currently taking consultations.
pub fn available(partners: &[LegalPartner]) -> impl Iterator<Item = &LegalPartner> {
    partners.iter().filter(|p| p.available)
}
