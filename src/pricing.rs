//! Order pricing.
//!
//! The price of an order depends only on the processing option and on how
//! the record is delivered. Delivery follows the contact details: an email
//! address means a digital copy, no email means a printed copy by post.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerStore, ProcessingOption};

/// How the copy of the record reaches the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryChannel {
    Email,
    Post,
}

impl DeliveryChannel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Digital (email)",
            Self::Post => "Printed (post)",
        }
    }
}

/// Prices in pence, one per (option, channel) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PriceTable {
    pub standard_digital: u32,
    pub standard_printed: u32,
    pub full_digital: u32,
    pub full_printed: u32,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            standard_digital: 4225,
            standard_printed: 4716,
            full_digital: 4887,
            full_printed: 4887,
        }
    }
}

impl PriceTable {
    pub fn price(&self, option: ProcessingOption, channel: DeliveryChannel) -> u32 {
        match (option, channel) {
            (ProcessingOption::Standard, DeliveryChannel::Email) => self.standard_digital,
            (ProcessingOption::Standard, DeliveryChannel::Post) => self.standard_printed,
            (ProcessingOption::Full, DeliveryChannel::Email) => self.full_digital,
            (ProcessingOption::Full, DeliveryChannel::Post) => self.full_printed,
        }
    }
}

/// What the order summary page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub processing_option: ProcessingOption,
    pub delivery: DeliveryChannel,
    pub price_pence: u32,
}

impl OrderSummary {
    /// Price the order held in `answers`.
    ///
    /// Returns `None` until a processing option has been chosen.
    pub fn from_answers(answers: &AnswerStore, prices: &PriceTable) -> Option<Self> {
        let processing_option =
            answers.choice::<ProcessingOption>("processing_option")?;
        let delivery = delivery_channel(answers);
        Some(Self {
            processing_option,
            delivery,
            price_pence: prices.price(processing_option, delivery),
        })
    }

    pub fn processing_option_label(&self) -> &'static str {
        match self.processing_option {
            ProcessingOption::Standard => "Standard",
            ProcessingOption::Full => "Full",
        }
    }

    pub fn formatted_price(&self) -> String {
        format_pence(self.price_pence)
    }
}

/// Email when an address was supplied, otherwise post.
pub fn delivery_channel(answers: &AnswerStore) -> DeliveryChannel {
    if answers.text("requester_email").is_some() {
        DeliveryChannel::Email
    } else {
        DeliveryChannel::Post
    }
}

/// `4225` → `£42.25`.
pub fn format_pence(pence: u32) -> String {
    format!("£{}.{:02}", pence / 100, pence % 100)
}
