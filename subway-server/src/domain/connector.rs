//! Attachment rules for joining a section onto a chain.
//!
//! When a new section is offered to a line, the chain walks its slots from
//! head to tail and asks, at each position, which rule (if any) lets the
//! request attach there. The first position with a matching rule wins.

use super::chain::SectionChain;
use super::section::{Section, SectionKey};

/// How a requested section attaches to the chain at one position.
///
/// The variants are checked in declaration order. Terminal extensions are
/// considered before splits so that a request touching a terminal station
/// extends the line instead of splitting its end section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionConnector {
    /// The request's up station is the chain's down terminal: the request
    /// becomes the new tail.
    ExtendTail,
    /// The request's down station is the chain's up terminal: the request
    /// becomes the new head.
    ExtendHead,
    /// The request shares its up station with the section at this
    /// position and carves out the leading part of that section's span.
    SplitForward,
    /// The request shares its down station with the section at this
    /// position and carves out the trailing part of that section's span.
    SplitBackward,
}

impl SectionConnector {
    /// Matches the requested section against the chain position `at`.
    ///
    /// Returns `None` when no endpoint lines up at this position, in
    /// which case the caller moves on to the next section down the chain.
    pub fn resolve(chain: &SectionChain, at: SectionKey, request: &Section) -> Option<Self> {
        let current = chain.section(at)?;
        let at_tail = chain.down_neighbor(at).is_none();
        let at_head = chain.up_neighbor(at).is_none();

        if at_tail && current.down_station().id() == request.up_station().id() {
            return Some(SectionConnector::ExtendTail);
        }

        if at_head && current.up_station().id() == request.down_station().id() {
            return Some(SectionConnector::ExtendHead);
        }

        if current.up_station().id() == request.up_station().id() {
            return Some(SectionConnector::SplitForward);
        }

        if current.down_station().id() == request.down_station().id() {
            return Some(SectionConnector::SplitBackward);
        }

        None
    }
}
