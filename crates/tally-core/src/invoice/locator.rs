//! Locate the amount that belongs to an identifier in invoice text.
//!
//! Invoices list one section per shipment: a line carrying the shipment
//! identifier, a few amount-bearing lines, and then either the next
//! shipment's ten-digit id or the document total. The amount of interest is
//! the last one in the section, except when a service subtotal line follows:
//! then the amount just before the subtotal wins.

use rust_decimal::Decimal;
use tracing::trace;

use super::document::Document;
use super::rules::amounts::{format_amount, TrailingAmountExtractor};
use super::rules::patterns::SECTION_ID;
use crate::models::config::LocatorConfig;

/// How a located amount was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// Last amount before the section ended.
    LastInSection,
    /// Amount preceding the one that came before a subtotal marker.
    BeforeSubtotal,
}

/// An amount found for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedAmount {
    /// The amount.
    pub value: Decimal,
    /// Index of the line the amount was read from.
    pub line_index: usize,
    /// Which rule selected it.
    pub source: AmountSource,
}

impl LocatedAmount {
    /// Canonical "1,234.50" form.
    pub fn formatted(&self) -> String {
        format_amount(self.value)
    }
}

/// Line-oriented scanner for identifier sections.
pub struct TextAmountLocator {
    boundary_marker: String,
    subtotal_marker: String,
    extractor: TrailingAmountExtractor,
}

impl TextAmountLocator {
    /// Create a locator with the default markers.
    pub fn new() -> Self {
        Self::from_config(&LocatorConfig::default())
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            boundary_marker: config.boundary_marker.clone(),
            subtotal_marker: config.subtotal_marker.clone(),
            extractor: TrailingAmountExtractor::new(),
        }
    }

    /// Find the amount for the first occurrence of `identifier`.
    ///
    /// Matching is plain case-sensitive substring containment. An empty
    /// identifier never matches.
    pub fn locate(&self, document: &Document, identifier: &str) -> Option<LocatedAmount> {
        if identifier.is_empty() {
            return None;
        }

        let mut scan = SectionScan::new(self, identifier);
        for (index, line) in document.lines().iter().enumerate() {
            match scan.feed(index, line) {
                Step::Continue => {}
                Step::Boundary => {
                    trace!("Section for {:?} ends at line {}", identifier, index);
                    break;
                }
                Step::Found(hit) => return Some(hit),
            }
        }
        scan.finish()
    }

    fn is_boundary(&self, line: &str) -> bool {
        SECTION_ID.is_match(line) || line.contains(&self.boundary_marker)
    }

    fn trailing_amount(&self, line_index: usize, line: &str) -> Option<Candidate> {
        match self.extractor.extract(line)? {
            Ok(value) => Some(Candidate { value, line_index }),
            Err(e) => {
                trace!("Skipping line {}: {}", line_index, e);
                None
            }
        }
    }
}

impl Default for TextAmountLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    value: Decimal,
    line_index: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum ScanState {
    /// Identifier not seen yet.
    Searching,
    /// Inside the identifier's section.
    InSection {
        start: usize,
        last: Option<Candidate>,
        previous: Option<Candidate>,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    /// Line opens the next section; it is not consumed.
    Boundary,
    Found(LocatedAmount),
}

struct SectionScan<'a> {
    locator: &'a TextAmountLocator,
    identifier: &'a str,
    state: ScanState,
}

impl<'a> SectionScan<'a> {
    fn new(locator: &'a TextAmountLocator, identifier: &'a str) -> Self {
        Self {
            locator,
            identifier,
            state: ScanState::Searching,
        }
    }

    fn feed(&mut self, index: usize, line: &str) -> Step {
        if self.state == ScanState::Searching {
            if !line.contains(self.identifier) {
                return Step::Continue;
            }
            trace!("Identifier {:?} found at line {}", self.identifier, index);
            self.state = ScanState::InSection {
                start: index,
                last: None,
                previous: None,
            };
        }

        let ScanState::InSection {
            start,
            last,
            previous,
        } = &mut self.state
        else {
            return Step::Continue;
        };

        if index != *start && self.locator.is_boundary(line) {
            return Step::Boundary;
        }

        if let Some(candidate) = self.locator.trailing_amount(index, line) {
            *previous = last.replace(candidate);
        }

        if line.starts_with(&self.locator.subtotal_marker) {
            if let Some(candidate) = previous {
                return Step::Found(LocatedAmount {
                    value: candidate.value,
                    line_index: candidate.line_index,
                    source: AmountSource::BeforeSubtotal,
                });
            }
        }

        Step::Continue
    }

    fn finish(self) -> Option<LocatedAmount> {
        match self.state {
            ScanState::InSection {
                last: Some(candidate),
                ..
            } => Some(LocatedAmount {
                value: candidate.value,
                line_index: candidate.line_index,
                source: AmountSource::LastInSection,
            }),
            _ => None,
        }
    }
}
