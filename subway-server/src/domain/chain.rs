//! The per-line chain of sections.
//!
//! A line's sections form a simple path from the up terminal to the down
//! terminal. The chain stores them as slots in an arena: each slot holds a
//! section plus the keys of its up and down neighbors, and removed slots
//! are tombstoned so keys stay stable for the lifetime of the line.
//!
//! Every mutating operation validates before it touches a slot. A rejected
//! edit leaves the chain exactly as it was.

use tracing::trace;

use super::connector::SectionConnector;
use super::error::SectionError;
use super::section::{Section, SectionId, SectionKey};
use super::station::{Station, StationId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChainSlot {
    section: Section,
    up: Option<SectionKey>,
    down: Option<SectionKey>,
}

/// Sections touched by a successful connect.
///
/// The store uses this to assign persistence ids to created sections and
/// to rewrite updated ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEdit {
    /// Keys of newly created sections, with no persistence id yet.
    pub created: Vec<SectionKey>,
    /// Keys of existing sections whose span or distance changed.
    pub updated: Vec<SectionKey>,
}

/// Outcome of removing a station from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRemoval {
    /// Sections dropped from the chain, in travel order.
    pub removed: Vec<Section>,
    /// Key of the replacement section bridging the removed pair, present
    /// only when an interior station was removed.
    pub merged: Option<SectionKey>,
}

/// Ordered chain of one line's sections.
///
/// A chain always holds at least one section: it is created around an
/// initial section and removals that would empty it are rejected.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Section, SectionChain, Station, StationId};
///
/// let gangnam = Station::new(StationId(1), "Gangnam").unwrap();
/// let yeoksam = Station::new(StationId(2), "Yeoksam").unwrap();
/// let seolleung = Station::new(StationId(3), "Seolleung").unwrap();
///
/// let mut chain = SectionChain::new(
///     Section::new(gangnam, yeoksam.clone(), 10).unwrap(),
/// );
/// chain
///     .connect(Section::new(yeoksam, seolleung, 5).unwrap())
///     .unwrap();
///
/// let names: Vec<_> = chain
///     .stations_in_order()
///     .iter()
///     .map(|s| s.name().to_string())
///     .collect();
/// assert_eq!(names, ["Gangnam", "Yeoksam", "Seolleung"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChain {
    slots: Vec<Option<ChainSlot>>,
}

impl SectionChain {
    /// Creates a chain holding the given initial section.
    pub fn new(initial: Section) -> Self {
        SectionChain {
            slots: vec![Some(ChainSlot {
                section: initial,
                up: None,
                down: None,
            })],
        }
    }

    /// Returns the section at `key`, if the slot is live.
    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        self.slot(key).map(|slot| &slot.section)
    }

    /// Returns the key of the section above `key`, if any.
    pub fn up_neighbor(&self, key: SectionKey) -> Option<SectionKey> {
        self.slot(key).and_then(|slot| slot.up)
    }

    /// Returns the key of the section below `key`, if any.
    pub fn down_neighbor(&self, key: SectionKey) -> Option<SectionKey> {
        self.slot(key).and_then(|slot| slot.down)
    }

    /// Returns the number of live sections.
    pub fn section_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns the key of the head section, the one with no up neighbor.
    pub fn head_key(&self) -> SectionKey {
        let mut key = self.first_live_key();
        while let Some(up) = self.up_neighbor(key) {
            key = up;
        }
        key
    }

    /// Returns the key of the tail section, the one with no down neighbor.
    pub fn tail_key(&self) -> SectionKey {
        let mut key = self.first_live_key();
        while let Some(down) = self.down_neighbor(key) {
            key = down;
        }
        key
    }

    /// Returns the station at the upper end of the line, the one no
    /// section arrives at.
    pub fn up_terminal(&self) -> &Station {
        self.section(self.head_key())
            .expect("head key points at a live slot")
            .up_station()
    }

    /// Returns the station at the lower end of the line, the one no
    /// section leaves from.
    pub fn down_terminal(&self) -> &Station {
        self.section(self.tail_key())
            .expect("tail key points at a live slot")
            .down_station()
    }

    /// Returns the keys of the live sections in travel order.
    pub fn keys_in_order(&self) -> Vec<SectionKey> {
        let mut keys = Vec::with_capacity(self.section_count());
        let mut cursor = Some(self.head_key());
        while let Some(key) = cursor {
            keys.push(key);
            cursor = self.down_neighbor(key);
        }
        keys
    }

    /// Returns copies of the live sections in travel order.
    pub fn sections_in_order(&self) -> Vec<Section> {
        self.keys_in_order()
            .into_iter()
            .filter_map(|key| self.section(key).cloned())
            .collect()
    }

    /// Returns the stations visited in travel order, terminals included.
    pub fn stations_in_order(&self) -> Vec<Station> {
        let sections = self.sections_in_order();
        let mut stations = Vec::with_capacity(sections.len() + 1);
        if let Some(first) = sections.first() {
            stations.push(first.up_station().clone());
        }
        for section in &sections {
            stations.push(section.down_station().clone());
        }
        stations
    }

    /// Returns true if any live section touches the given station.
    pub fn contains_station(&self, station: StationId) -> bool {
        self.live_sections().any(|section| section.joins(station))
    }

    /// Sets the persistence id of the section at `key`.
    pub fn assign_section_id(&mut self, key: SectionKey, id: SectionId) {
        if let Some(slot) = self.slots.get_mut(key.0).and_then(Option::as_mut) {
            slot.section.assign_id(id);
        }
    }

    /// Replaces stored copies of `station`, matched by id, in every
    /// section that touches it. Returns true when any copy was replaced.
    pub fn refresh_station(&mut self, station: &Station) -> bool {
        let mut touched = false;
        for slot in self.slots.iter_mut().flatten() {
            if slot.section.joins(station.id()) {
                slot.section.refresh_station(station);
                touched = true;
            }
        }
        touched
    }

    /// Attaches a section to the chain.
    ///
    /// Walks the chain from head to tail and applies the first attachment
    /// rule that matches. On success, returns the keys of the sections
    /// that were created or changed. On failure, the chain is unchanged.
    pub fn connect(&mut self, request: Section) -> Result<ChainEdit, SectionError> {
        let up = request.up_station().id();
        let down = request.down_station().id();

        if self.contains_station(up) && self.contains_station(down) {
            return Err(SectionError::DuplicateConnection { up, down });
        }

        let mut cursor = Some(self.head_key());
        while let Some(key) = cursor {
            if let Some(rule) = SectionConnector::resolve(self, key, &request) {
                trace!(%request, ?rule, at = %key, "attaching section");
                return self.apply(rule, key, request);
            }
            cursor = self.down_neighbor(key);
        }

        Err(SectionError::Unconnectable { up, down })
    }

    /// Discards the tail section, severing its link to the rest.
    ///
    /// Returns the discarded section. Fails with
    /// [`SectionError::NoDownSection`] when the chain has a single
    /// section, since the head has nothing below it to disconnect.
    pub fn disconnect_tail(&mut self) -> Result<Section, SectionError> {
        let tail = self.tail_key();
        let Some(above) = self.up_neighbor(tail) else {
            return Err(SectionError::NoDownSection);
        };
        let Some(removed) = self.take_slot(tail) else {
            return Err(SectionError::NoDownSection);
        };
        self.relink_down(above, None);
        Ok(removed)
    }

    /// Removes a station from the chain.
    ///
    /// A terminal station takes its single section with it. An interior
    /// station takes both adjacent sections, which are replaced by one
    /// merged section spanning their combined distance. The merged
    /// section has no persistence id until the store assigns one.
    pub fn remove_station(&mut self, station: StationId) -> Result<ChainRemoval, SectionError> {
        let arriving = self.key_arriving_at(station);
        let leaving = self.key_leaving_from(station);

        if arriving.is_none() && leaving.is_none() {
            return Err(SectionError::StationNotInLine { station });
        }

        if self.section_count() == 1 {
            return Err(SectionError::LastSection);
        }

        match (arriving, leaving) {
            (Some(above), Some(below)) => self.remove_interior(station, above, below),
            // Down terminal: the arriving section is the tail
            (Some(_), None) => {
                let removed = self.disconnect_tail()?;
                Ok(ChainRemoval {
                    removed: vec![removed],
                    merged: None,
                })
            }
            // Up terminal: the leaving section is the head
            (None, Some(_)) => {
                let removed = self.disconnect_head()?;
                Ok(ChainRemoval {
                    removed: vec![removed],
                    merged: None,
                })
            }
            (None, None) => Err(SectionError::StationNotInLine { station }),
        }
    }

    fn apply(
        &mut self,
        rule: SectionConnector,
        at: SectionKey,
        request: Section,
    ) -> Result<ChainEdit, SectionError> {
        match rule {
            SectionConnector::ExtendTail => {
                let key = self.insert_slot(request, Some(at), None);
                self.relink_down(at, Some(key));
                Ok(ChainEdit {
                    created: vec![key],
                    updated: Vec::new(),
                })
            }
            SectionConnector::ExtendHead => {
                let key = self.insert_slot(request, None, Some(at));
                self.relink_up(at, Some(key));
                Ok(ChainEdit {
                    created: vec![key],
                    updated: Vec::new(),
                })
            }
            SectionConnector::SplitForward => self.split_forward(at, request),
            SectionConnector::SplitBackward => self.split_backward(at, request),
        }
    }

    /// Splits the section at `at` around the request's down station.
    ///
    /// The existing section shrinks to the requested leading span and
    /// keeps its id; a new section covers the remainder down to the old
    /// down station.
    fn split_forward(&mut self, at: SectionKey, request: Section) -> Result<ChainEdit, SectionError> {
        let Some((current, old_down)) = self.slot(at).map(|s| (s.section.clone(), s.down)) else {
            return Err(SectionError::Unconnectable {
                up: request.up_station().id(),
                down: request.down_station().id(),
            });
        };

        if request.distance() >= current.distance() {
            return Err(SectionError::DistanceTooLarge {
                requested: request.distance(),
                existing: current.distance(),
            });
        }

        let trailing = Section::new(
            request.down_station().clone(),
            current.down_station().clone(),
            current.distance() - request.distance(),
        )?;
        let mut leading = Section::new(
            current.up_station().clone(),
            request.down_station().clone(),
            request.distance(),
        )?;
        if let Some(id) = current.id() {
            leading = leading.with_id(id);
        }

        let trailing_key = self.insert_slot(trailing, Some(at), old_down);
        if let Some(down) = old_down {
            self.relink_up(down, Some(trailing_key));
        }
        self.replace_section(at, leading);
        self.relink_down(at, Some(trailing_key));

        Ok(ChainEdit {
            created: vec![trailing_key],
            updated: vec![at],
        })
    }

    /// Splits the section at `at` around the request's up station.
    ///
    /// The existing section shrinks to the requested trailing span and
    /// keeps its id; a new section covers the remainder up to the old up
    /// station.
    fn split_backward(
        &mut self,
        at: SectionKey,
        request: Section,
    ) -> Result<ChainEdit, SectionError> {
        let Some((current, old_up)) = self.slot(at).map(|s| (s.section.clone(), s.up)) else {
            return Err(SectionError::Unconnectable {
                up: request.up_station().id(),
                down: request.down_station().id(),
            });
        };

        if request.distance() >= current.distance() {
            return Err(SectionError::DistanceTooLarge {
                requested: request.distance(),
                existing: current.distance(),
            });
        }

        let leading = Section::new(
            current.up_station().clone(),
            request.up_station().clone(),
            current.distance() - request.distance(),
        )?;
        let mut trailing = Section::new(
            request.up_station().clone(),
            current.down_station().clone(),
            request.distance(),
        )?;
        if let Some(id) = current.id() {
            trailing = trailing.with_id(id);
        }

        let leading_key = self.insert_slot(leading, old_up, Some(at));
        if let Some(up) = old_up {
            self.relink_down(up, Some(leading_key));
        }
        self.replace_section(at, trailing);
        self.relink_up(at, Some(leading_key));

        Ok(ChainEdit {
            created: vec![leading_key],
            updated: vec![at],
        })
    }

    fn remove_interior(
        &mut self,
        station: StationId,
        above: SectionKey,
        below: SectionKey,
    ) -> Result<ChainRemoval, SectionError> {
        let Some((above_section, outer_up)) =
            self.slot(above).map(|s| (s.section.clone(), s.up))
        else {
            return Err(SectionError::StationNotInLine { station });
        };
        let Some((below_section, outer_down)) =
            self.slot(below).map(|s| (s.section.clone(), s.down))
        else {
            return Err(SectionError::StationNotInLine { station });
        };

        let Some(total) = above_section
            .distance()
            .checked_add(below_section.distance())
        else {
            return Err(SectionError::DistanceOverflow {
                above: above_section.distance(),
                below: below_section.distance(),
            });
        };
        let merged = Section::new(
            above_section.up_station().clone(),
            below_section.down_station().clone(),
            total,
        )?;

        let merged_key = self.insert_slot(merged, outer_up, outer_down);
        if let Some(up) = outer_up {
            self.relink_down(up, Some(merged_key));
        }
        if let Some(down) = outer_down {
            self.relink_up(down, Some(merged_key));
        }
        self.clear_slot(above);
        self.clear_slot(below);

        trace!(%station, merged = %merged_key, "removed interior station");

        Ok(ChainRemoval {
            removed: vec![above_section, below_section],
            merged: Some(merged_key),
        })
    }

    /// Discards the head section. The chain must have more than one
    /// section, which `remove_station` guarantees.
    fn disconnect_head(&mut self) -> Result<Section, SectionError> {
        let head = self.head_key();
        let Some(below) = self.down_neighbor(head) else {
            return Err(SectionError::NoDownSection);
        };
        let Some(removed) = self.take_slot(head) else {
            return Err(SectionError::NoDownSection);
        };
        self.relink_up(below, None);
        Ok(removed)
    }

    /// Key of the section whose down station is `station`.
    fn key_arriving_at(&self, station: StationId) -> Option<SectionKey> {
        self.live_entries()
            .find(|(_, section)| section.down_station().id() == station)
            .map(|(key, _)| key)
    }

    /// Key of the section whose up station is `station`.
    fn key_leaving_from(&self, station: StationId) -> Option<SectionKey> {
        self.live_entries()
            .find(|(_, section)| section.up_station().id() == station)
            .map(|(key, _)| key)
    }

    fn live_sections(&self) -> impl Iterator<Item = &Section> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| &slot.section)
    }

    fn live_entries(&self) -> impl Iterator<Item = (SectionKey, &Section)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|slot| (SectionKey(index), &slot.section))
        })
    }

    fn first_live_key(&self) -> SectionKey {
        // A chain is created around one section and removals that would
        // empty it are rejected, so a live slot always exists.
        let index = self
            .slots
            .iter()
            .position(Option::is_some)
            .expect("chain holds at least one section");
        SectionKey(index)
    }

    fn slot(&self, key: SectionKey) -> Option<&ChainSlot> {
        self.slots.get(key.0).and_then(Option::as_ref)
    }

    fn insert_slot(
        &mut self,
        section: Section,
        up: Option<SectionKey>,
        down: Option<SectionKey>,
    ) -> SectionKey {
        let key = SectionKey(self.slots.len());
        self.slots.push(Some(ChainSlot { section, up, down }));
        key
    }

    fn relink_up(&mut self, key: SectionKey, up: Option<SectionKey>) {
        if let Some(slot) = self.slots.get_mut(key.0).and_then(Option::as_mut) {
            slot.up = up;
        }
    }

    fn relink_down(&mut self, key: SectionKey, down: Option<SectionKey>) {
        if let Some(slot) = self.slots.get_mut(key.0).and_then(Option::as_mut) {
            slot.down = down;
        }
    }

    fn replace_section(&mut self, key: SectionKey, section: Section) {
        if let Some(slot) = self.slots.get_mut(key.0).and_then(Option::as_mut) {
            slot.section = section;
        }
    }

    fn take_slot(&mut self, key: SectionKey) -> Option<Section> {
        self.slots.get_mut(key.0)?.take().map(|slot| slot.section)
    }

    fn clear_slot(&mut self, key: SectionKey) {
        if let Some(slot) = self.slots.get_mut(key.0) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: i64) -> Station {
        Station::new(StationId(id), format!("Station {id}")).unwrap()
    }

    fn section(up: i64, down: i64, distance: u32) -> Section {
        Section::new(station(up), station(down), distance).unwrap()
    }

    fn station_ids(chain: &SectionChain) -> Vec<i64> {
        chain.stations_in_order().iter().map(|s| s.id().0).collect()
    }

    fn distances(chain: &SectionChain) -> Vec<u32> {
        chain
            .sections_in_order()
            .iter()
            .map(Section::distance)
            .collect()
    }

    #[test]
    fn new_chain_holds_initial_section() {
        let chain = SectionChain::new(section(1, 2, 10));

        assert_eq!(chain.section_count(), 1);
        assert_eq!(station_ids(&chain), [1, 2]);
        assert_eq!(distances(&chain), [10]);
        assert_eq!(chain.head_key(), chain.tail_key());
    }

    #[test]
    fn connect_extends_tail() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let edit = chain.connect(section(2, 3, 5)).unwrap();

        assert_eq!(edit.created.len(), 1);
        assert!(edit.updated.is_empty());
        assert_eq!(station_ids(&chain), [1, 2, 3]);
        assert_eq!(distances(&chain), [10, 5]);
        assert_eq!(chain.tail_key(), edit.created[0]);
    }

    #[test]
    fn connect_extends_head() {
        let mut chain = SectionChain::new(section(2, 3, 10));
        let edit = chain.connect(section(1, 2, 5)).unwrap();

        assert_eq!(edit.created.len(), 1);
        assert!(edit.updated.is_empty());
        assert_eq!(station_ids(&chain), [1, 2, 3]);
        assert_eq!(distances(&chain), [5, 10]);
        assert_eq!(chain.head_key(), edit.created[0]);
    }

    #[test]
    fn connect_splits_forward() {
        // 1 -> 3 (10), insert 1 -> 2 (4): 1 -> 2 (4), 2 -> 3 (6)
        let mut chain = SectionChain::new(section(1, 3, 10));
        let edit = chain.connect(section(1, 2, 4)).unwrap();

        assert_eq!(station_ids(&chain), [1, 2, 3]);
        assert_eq!(distances(&chain), [4, 6]);
        assert_eq!(edit.created.len(), 1);
        assert_eq!(edit.updated.len(), 1);

        let created = chain.section(edit.created[0]).unwrap();
        assert_eq!(created.up_station().id(), StationId(2));
        assert_eq!(created.down_station().id(), StationId(3));
        assert_eq!(created.distance(), 6);
    }

    #[test]
    fn connect_splits_backward() {
        // 1 -> 3 (10), insert 2 -> 3 (4): 1 -> 2 (6), 2 -> 3 (4)
        let mut chain = SectionChain::new(section(1, 3, 10));
        let edit = chain.connect(section(2, 3, 4)).unwrap();

        assert_eq!(station_ids(&chain), [1, 2, 3]);
        assert_eq!(distances(&chain), [6, 4]);

        let created = chain.section(edit.created[0]).unwrap();
        assert_eq!(created.up_station().id(), StationId(1));
        assert_eq!(created.down_station().id(), StationId(2));
        assert_eq!(created.distance(), 6);
    }

    #[test]
    fn forward_split_keeps_id_on_leading_piece() {
        let mut chain = SectionChain::new(section(1, 3, 10));
        chain.assign_section_id(chain.head_key(), SectionId(41));

        let edit = chain.connect(section(1, 2, 4)).unwrap();

        let leading = chain.section(edit.updated[0]).unwrap();
        assert_eq!(leading.id(), Some(SectionId(41)));
        assert_eq!(leading.down_station().id(), StationId(2));

        let trailing = chain.section(edit.created[0]).unwrap();
        assert_eq!(trailing.id(), None);
    }

    #[test]
    fn backward_split_keeps_id_on_trailing_piece() {
        let mut chain = SectionChain::new(section(1, 3, 10));
        chain.assign_section_id(chain.head_key(), SectionId(41));

        let edit = chain.connect(section(2, 3, 4)).unwrap();

        let trailing = chain.section(edit.updated[0]).unwrap();
        assert_eq!(trailing.id(), Some(SectionId(41)));
        assert_eq!(trailing.up_station().id(), StationId(2));

        let leading = chain.section(edit.created[0]).unwrap();
        assert_eq!(leading.id(), None);
    }

    #[test]
    fn split_preserves_links_to_the_rest_of_the_chain() {
        // 1 -> 2 -> 4, then split 2 -> 4 with 2 -> 3
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 4, 8)).unwrap();
        chain.connect(section(2, 3, 5)).unwrap();

        assert_eq!(station_ids(&chain), [1, 2, 3, 4]);
        assert_eq!(distances(&chain), [10, 5, 3]);
    }

    #[test]
    fn middle_insert_walks_past_the_head() {
        // 1 -> 2 -> 3; request 2 -> 9 matches nothing at the head slot
        // and splits 2 -> 3 further down the walk
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 6)).unwrap();
        chain.connect(section(2, 9, 2)).unwrap();

        assert_eq!(station_ids(&chain), [1, 2, 9, 3]);
        assert_eq!(distances(&chain), [10, 2, 4]);
    }

    #[test]
    fn reject_split_with_equal_distance() {
        let mut chain = SectionChain::new(section(1, 3, 10));
        let before = chain.clone();

        let err = chain.connect(section(1, 2, 10)).unwrap_err();

        assert_eq!(
            err,
            SectionError::DistanceTooLarge {
                requested: 10,
                existing: 10
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn reject_split_with_larger_distance() {
        let mut chain = SectionChain::new(section(1, 3, 10));
        let before = chain.clone();

        let err = chain.connect(section(2, 3, 12)).unwrap_err();

        assert_eq!(
            err,
            SectionError::DistanceTooLarge {
                requested: 12,
                existing: 10
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn reject_duplicate_connection() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();
        let before = chain.clone();

        let err = chain.connect(section(1, 3, 2)).unwrap_err();

        assert_eq!(
            err,
            SectionError::DuplicateConnection {
                up: StationId(1),
                down: StationId(3)
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn reject_cycle_back_to_the_head() {
        // 1 -> 2 -> 3; 3 -> 1 would close a loop
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();
        let before = chain.clone();

        let err = chain.connect(section(3, 1, 2)).unwrap_err();

        assert_eq!(
            err,
            SectionError::DuplicateConnection {
                up: StationId(3),
                down: StationId(1)
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn reject_unconnectable_section() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let before = chain.clone();

        let err = chain.connect(section(8, 9, 5)).unwrap_err();

        assert_eq!(
            err,
            SectionError::Unconnectable {
                up: StationId(8),
                down: StationId(9)
            }
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn disconnect_tail_drops_last_section() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();

        let removed = chain.disconnect_tail().unwrap();

        assert_eq!(removed.up_station().id(), StationId(2));
        assert_eq!(removed.down_station().id(), StationId(3));
        assert_eq!(station_ids(&chain), [1, 2]);
        assert_eq!(chain.section_count(), 1);
    }

    #[test]
    fn disconnect_tail_fails_on_single_section() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let before = chain.clone();

        assert_eq!(chain.disconnect_tail(), Err(SectionError::NoDownSection));
        assert_eq!(chain, before);
    }

    #[test]
    fn remove_interior_station_merges_neighbors() {
        // 1 -> 2 -> 3 -> 4 with distances 1, 2, 4; removing 2 merges
        // 1 -> 3 at distance 3 and leaves 3 -> 4 alone
        let mut chain = SectionChain::new(section(1, 2, 1));
        chain.connect(section(2, 3, 2)).unwrap();
        chain.connect(section(3, 4, 4)).unwrap();

        let removal = chain.remove_station(StationId(2)).unwrap();

        assert_eq!(station_ids(&chain), [1, 3, 4]);
        assert_eq!(distances(&chain), [3, 4]);

        assert_eq!(removal.removed.len(), 2);
        assert_eq!(removal.removed[0].up_station().id(), StationId(1));
        assert_eq!(removal.removed[0].down_station().id(), StationId(2));
        assert_eq!(removal.removed[1].up_station().id(), StationId(2));
        assert_eq!(removal.removed[1].down_station().id(), StationId(3));

        let merged_key = removal.merged.unwrap();
        let merged = chain.section(merged_key).unwrap();
        assert_eq!(merged.up_station().id(), StationId(1));
        assert_eq!(merged.down_station().id(), StationId(3));
        assert_eq!(merged.distance(), 3);
        assert_eq!(merged.id(), None);
    }

    #[test]
    fn remove_interior_station_rejects_oversized_merge() {
        // 1 -> 2 -> 3 whose spans cannot merge into one u32 distance
        let mut chain = SectionChain::new(section(1, 2, u32::MAX));
        chain.connect(section(2, 3, 2)).unwrap();
        let before = chain.clone();

        assert_eq!(
            chain.remove_station(StationId(2)),
            Err(SectionError::DistanceOverflow {
                above: u32::MAX,
                below: 2,
            })
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn remove_up_terminal_drops_head_section() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();

        let removal = chain.remove_station(StationId(1)).unwrap();

        assert_eq!(station_ids(&chain), [2, 3]);
        assert_eq!(removal.removed.len(), 1);
        assert_eq!(removal.removed[0].up_station().id(), StationId(1));
        assert!(removal.merged.is_none());
    }

    #[test]
    fn remove_down_terminal_drops_tail_section() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();

        let removal = chain.remove_station(StationId(3)).unwrap();

        assert_eq!(station_ids(&chain), [1, 2]);
        assert_eq!(removal.removed.len(), 1);
        assert_eq!(removal.removed[0].down_station().id(), StationId(3));
        assert!(removal.merged.is_none());
    }

    #[test]
    fn remove_absent_station_fails() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let before = chain.clone();

        assert_eq!(
            chain.remove_station(StationId(9)),
            Err(SectionError::StationNotInLine {
                station: StationId(9)
            })
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn remove_from_single_section_chain_fails() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let before = chain.clone();

        assert_eq!(
            chain.remove_station(StationId(1)),
            Err(SectionError::LastSection)
        );
        assert_eq!(chain, before);
    }

    #[test]
    fn absent_station_wins_over_last_section() {
        // Not-on-the-line is reported even when the chain is down to one
        // section
        let mut chain = SectionChain::new(section(1, 2, 10));

        assert_eq!(
            chain.remove_station(StationId(9)),
            Err(SectionError::StationNotInLine {
                station: StationId(9)
            })
        );
    }

    #[test]
    fn keys_stay_valid_across_removals() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        let edit = chain.connect(section(2, 3, 5)).unwrap();
        let tail_key = edit.created[0];

        chain.remove_station(StationId(1)).unwrap();

        // The surviving section is still addressable under its old key
        let survivor = chain.section(tail_key).unwrap();
        assert_eq!(survivor.up_station().id(), StationId(2));
        assert_eq!(chain.head_key(), tail_key);
    }

    #[test]
    fn terminals_track_the_chain_ends() {
        let mut chain = SectionChain::new(section(2, 3, 10));
        assert_eq!(chain.up_terminal().id(), StationId(2));
        assert_eq!(chain.down_terminal().id(), StationId(3));

        chain.connect(section(1, 2, 5)).unwrap();
        chain.connect(section(3, 4, 5)).unwrap();

        assert_eq!(chain.up_terminal().id(), StationId(1));
        assert_eq!(chain.down_terminal().id(), StationId(4));
    }

    #[test]
    fn contains_station_tracks_edits() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        assert!(chain.contains_station(StationId(1)));
        assert!(!chain.contains_station(StationId(3)));

        chain.connect(section(2, 3, 5)).unwrap();
        assert!(chain.contains_station(StationId(3)));

        chain.remove_station(StationId(3)).unwrap();
        assert!(!chain.contains_station(StationId(3)));
    }

    #[test]
    fn assign_section_id_is_visible_in_snapshots() {
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.assign_section_id(chain.head_key(), SectionId(7));

        let sections = chain.sections_in_order();
        assert_eq!(sections[0].id(), Some(SectionId(7)));
    }

    #[test]
    fn refresh_station_rewrites_every_copy() {
        // Station 2 sits in two sections; both copies pick up the rename
        let mut chain = SectionChain::new(section(1, 2, 10));
        chain.connect(section(2, 3, 5)).unwrap();

        let renamed = Station::new(StationId(2), "Renamed").unwrap();
        assert!(chain.refresh_station(&renamed));

        assert_eq!(chain.stations_in_order()[1].name(), "Renamed");
        let sections = chain.sections_in_order();
        assert_eq!(sections[0].down_station().name(), "Renamed");
        assert_eq!(sections[1].up_station().name(), "Renamed");

        let stranger = Station::new(StationId(9), "Ghost").unwrap();
        assert!(!chain.refresh_station(&stranger));
    }
}
