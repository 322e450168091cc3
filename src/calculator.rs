//! Treatment cost calculator with financing estimate.
//!
//! Visitors pick treatments, see the total and a monthly payment, and can
//! hand off to the chat widget with a pre-filled message.

use crate::analytics::{self, Analytics, TrackedEvent};
use crate::engine::ChatTrigger;
use crate::models::Site;

/// Annual rate used for the monthly payment estimate.
pub const FINANCING_APR: f64 = 0.1299;

/// Totals at or above this many dollars show financing options.
pub const FINANCING_THRESHOLD: u32 = 500;

/// Analytics source id for hand-offs from the calculator.
pub const CALCULATOR_SOURCE: &str = "aboutface_cost_calculator";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("unknown treatment '{0}'")]
    UnknownTreatment(String),

    #[error("unsupported financing term: {0} months (choose 6, 12, 18, 24 or 36)")]
    UnsupportedTerm(u32),

    #[error("no cost calculator for {0}")]
    NoPriceList(Site),
}

/// A priced treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Treatment {
    pub id: &'static str,
    pub name: &'static str,
    /// Whole dollars
    pub price: u32,
}

const ABOUT_FACE_TREATMENTS: &[Treatment] = &[
    Treatment {
        id: "dermal-fillers",
        name: "Dermal Fillers",
        price: 850,
    },
    Treatment {
        id: "botox-facial",
        name: "Botox Facial",
        price: 360,
    },
    Treatment {
        id: "facial-threading",
        name: "Facial Threading",
        price: 1800,
    },
    Treatment {
        id: "chemical-peels",
        name: "Chemical Peels",
        price: 275,
    },
    Treatment {
        id: "microneedling",
        name: "Microneedling",
        price: 500,
    },
    Treatment {
        id: "facial-contouring",
        name: "Facial Contouring",
        price: 3200,
    },
];

/// Treatments a site's calculator offers.
pub fn price_list(site: Site) -> Result<&'static [Treatment], CalculatorError> {
    match site {
        Site::AboutFace => Ok(ABOUT_FACE_TREATMENTS),
        other => Err(CalculatorError::NoPriceList(other)),
    }
}

/// Financing term in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancingTerm(u32);

impl FinancingTerm {
    pub const CHOICES: [u32; 5] = [6, 12, 18, 24, 36];

    pub fn months(&self) -> u32 {
        self.0
    }
}

impl Default for FinancingTerm {
    fn default() -> Self {
        FinancingTerm(12)
    }
}

impl TryFrom<u32> for FinancingTerm {
    type Error = CalculatorError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        if Self::CHOICES.contains(&months) {
            Ok(FinancingTerm(months))
        } else {
            Err(CalculatorError::UnsupportedTerm(months))
        }
    }
}

/// Why the visitor wants to talk to someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HandoffContext {
    Financing,
    Consultation,
}

impl HandoffContext {
    fn label(&self) -> &'static str {
        match self {
            HandoffContext::Financing => "financing",
            HandoffContext::Consultation => "consultation",
        }
    }
}

/// Selected treatments and term.
#[derive(Debug, Clone)]
pub struct Estimate {
    treatments: &'static [Treatment],
    selected: Vec<&'static str>,
    term: FinancingTerm,
}

impl Estimate {
    pub fn new(site: Site) -> Result<Self, CalculatorError> {
        Ok(Self {
            treatments: price_list(site)?,
            selected: Vec::new(),
            term: FinancingTerm::default(),
        })
    }

    /// Select a treatment, or deselect it if already selected.
    pub fn toggle(&mut self, id: &str) -> Result<(), CalculatorError> {
        let treatment = self
            .treatments
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CalculatorError::UnknownTreatment(id.to_string()))?;

        if let Some(pos) = self.selected.iter().position(|s| *s == treatment.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(treatment.id);
        }
        Ok(())
    }

    pub fn set_term(&mut self, term: FinancingTerm) {
        self.term = term;
    }

    pub fn term(&self) -> FinancingTerm {
        self.term
    }

    /// Selected treatments, in selection order.
    pub fn selected(&self) -> Vec<&'static Treatment> {
        self.selected
            .iter()
            .filter_map(|id| self.treatments.iter().find(|t| t.id == *id))
            .collect()
    }

    pub fn total(&self) -> u32 {
        self.selected().iter().map(|t| t.price).sum()
    }

    pub fn monthly_payment(&self) -> u32 {
        monthly_payment(self.total(), self.term)
    }

    pub fn financing_available(&self) -> bool {
        self.total() >= FINANCING_THRESHOLD
    }

    /// Message injected into the chat when the visitor asks to talk.
    pub fn handoff_message(&self, context: HandoffContext) -> String {
        match context {
            HandoffContext::Financing => format!(
                "I'm interested in financing options for EmFace treatments. \
                 My estimated investment is ${}",
                format_dollars(self.total())
            ),
            HandoffContext::Consultation => {
                "I'd like to schedule a consultation for EmFace treatments at AboutFace Aesthetics"
                    .to_string()
            }
        }
    }

    /// Track the hand-off and push the message into the chat widget.
    pub fn hand_off(&self, context: HandoffContext, analytics: &dyn Analytics, chat: &ChatTrigger) {
        analytics::fire_chat_open(analytics, CALCULATOR_SOURCE);
        analytics::fire(
            analytics,
            TrackedEvent::new("financing_interest", "conversion", context.label()),
        );
        chat.send_message(self.handoff_message(context));
    }
}

/// Standard amortized payment, rounded to the nearest dollar.
pub fn monthly_payment(total: u32, term: FinancingTerm) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = FINANCING_APR / 12.0;
    let growth = (1.0 + rate).powi(term.months() as i32);
    let payment = total as f64 * (rate * growth) / (growth - 1.0);
    payment.round() as u32
}

/// `2400` -> `2,400`
pub fn format_dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
