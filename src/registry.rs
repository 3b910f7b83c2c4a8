//! Group address registry.
//!
//! Maps caller-chosen symbolic ids to group addresses and back. Several ids
//! may alias one wire address; reverse lookup yields all of them in
//! registration order.
//!
//! Entries are added once at startup and never removed. Storage is fixed
//! capacity: `N` bindings, each id at most [`MAX_ID_LEN`] bytes.
//!
//! ```
//! use knx_tp::registry::GroupAddressRegistry;
//! use knx_tp::ga;
//!
//! let mut registry: GroupAddressRegistry<16> = GroupAddressRegistry::new();
//! registry.register("hall_light", ga!(1/2/3))?;
//! registry.register("all_lights", ga!(1/2/3))?;
//!
//! assert_eq!(registry.lookup_by_id("hall_light")?, ga!(1/2/3));
//! let ids: Vec<&str> = registry.lookup_by_address(ga!(1/2/3)).collect();
//! assert_eq!(ids, ["hall_light", "all_lights"]);
//! # Ok::<(), knx_tp::KnxError>(())
//! ```

use crate::addressing::GroupAddress;
use crate::error::{KnxError, Result};

/// Longest accepted symbolic id, in bytes
pub const MAX_ID_LEN: usize = 32;

/// Owned symbolic id
pub type SymbolicId = heapless::String<MAX_ID_LEN>;

/// Build a [`SymbolicId`], rejecting ids longer than [`MAX_ID_LEN`].
pub fn symbolic_id(id: &str) -> Result<SymbolicId> {
    let mut owned = SymbolicId::new();
    if owned.push_str(id).is_err() {
        return Err(KnxError::id_too_long());
    }
    Ok(owned)
}

#[derive(Debug, Clone)]
struct Binding {
    id: SymbolicId,
    address: GroupAddress,
    /// Next binding sharing `address`
    next_alias: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct AddressSlot {
    address: GroupAddress,
    head: usize,
    tail: usize,
}

/// Bidirectional symbolic id / group address map.
#[derive(Debug, Clone)]
pub struct GroupAddressRegistry<const N: usize = 64> {
    /// Registration order
    bindings: heapless::Vec<Binding, N>,
    /// Sorted by address
    index: heapless::Vec<AddressSlot, N>,
}

impl<const N: usize> Default for GroupAddressRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GroupAddressRegistry<N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            bindings: heapless::Vec::new(),
            index: heapless::Vec::new(),
        }
    }

    /// Bind `id` to `address`.
    ///
    /// Either both the forward and the reverse mapping are updated or, on
    /// error, neither is.
    ///
    /// # Errors
    ///
    /// - `DuplicateId` if `id` is already bound
    /// - `IdTooLong` if `id` exceeds [`MAX_ID_LEN`]
    /// - `CapacityExceeded` if `N` bindings exist
    pub fn register(&mut self, id: &str, address: GroupAddress) -> Result<()> {
        let owned = symbolic_id(id)?;
        if self.position(id).is_some() {
            knx_log!(warn, "Duplicate group address id {}", id);
            return Err(KnxError::duplicate_id());
        }
        if self.bindings.is_full() {
            return Err(KnxError::capacity_exceeded());
        }

        let new = self.bindings.len();
        let binding = Binding {
            id: owned,
            address,
            next_alias: None,
        };
        if self.bindings.push(binding).is_err() {
            return Err(KnxError::capacity_exceeded());
        }

        match self.index.binary_search_by_key(&address, |slot| slot.address) {
            Ok(pos) => {
                let tail = self.index[pos].tail;
                self.index[pos].tail = new;
                self.bindings[tail].next_alias = Some(new);
            }
            Err(pos) => {
                let slot = AddressSlot {
                    address,
                    head: new,
                    tail: new,
                };
                if self.index.insert(pos, slot).is_err() {
                    self.bindings.pop();
                    return Err(KnxError::capacity_exceeded());
                }
            }
        }

        knx_log!(debug, "Registered {} -> {}", id, address.raw());
        Ok(())
    }

    /// Parse `address` (`"1/2/3"` or `"1.2.3"`) and bind `id` to it.
    pub fn register_str(&mut self, id: &str, address: &str) -> Result<()> {
        let address: GroupAddress = address.parse()?;
        self.register(id, address)
    }

    /// Group address bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn lookup_by_id(&self, id: &str) -> Result<GroupAddress> {
        self.position(id)
            .map(|i| self.bindings[i].address)
            .ok_or_else(KnxError::not_found)
    }

    /// Every id bound to `address`, in registration order.
    ///
    /// Empty if the address is unknown.
    pub fn lookup_by_address(&self, address: GroupAddress) -> Aliases<'_> {
        let next = self
            .index
            .binary_search_by_key(&address, |slot| slot.address)
            .ok()
            .map(|pos| self.index[pos].head);
        Aliases {
            bindings: &self.bindings,
            next,
        }
    }

    /// Check whether `id` is bound
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All `(id, address)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, GroupAddress)> + '_ {
        self.bindings.iter().map(|b| (b.id.as_str(), b.address))
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no id is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of distinct group addresses
    pub fn address_count(&self) -> usize {
        self.index.len()
    }

    /// Maximum number of bindings
    pub const fn capacity(&self) -> usize {
        N
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.id.as_str() == id)
    }
}

/// Iterator over the ids sharing one group address.
#[derive(Debug, Clone)]
pub struct Aliases<'r> {
    bindings: &'r [Binding],
    next: Option<usize>,
}

impl<'r> Iterator for Aliases<'r> {
    type Item = &'r str;

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.bindings.get(self.next?)?;
        self.next = binding.next_alias;
        Some(binding.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ga(main: u8, middle: u8, sub: u8) -> GroupAddress {
        GroupAddress::new(main, middle, sub).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry: GroupAddressRegistry<8> = GroupAddressRegistry::new();
        registry.register("light", ga(1, 2, 3)).unwrap();
        assert_eq!(registry.lookup_by_id("light").unwrap(), ga(1, 2, 3));
        assert!(registry.contains("light"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let registry: GroupAddressRegistry<8> = GroupAddressRegistry::new();
        assert!(registry.lookup_by_id("nope").unwrap_err().is_not_found());
        assert_eq!(registry.lookup_by_address(ga(1, 2, 3)).count(), 0);
    }

    #[test]
    fn test_duplicate_id_rejected_atomically() {
        let mut registry: GroupAddressRegistry<8> = GroupAddressRegistry::new();
        registry.register("light", ga(1, 2, 3)).unwrap();
        let err = registry.register("light", ga(4, 5, 6)).unwrap_err();
        assert!(err.is_duplicate_id());

        // Neither direction saw the failed registration
        assert_eq!(registry.lookup_by_id("light").unwrap(), ga(1, 2, 3));
        assert_eq!(registry.lookup_by_address(ga(4, 5, 6)).count(), 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.address_count(), 1);
    }

    #[test]
    fn test_aliases_in_registration_order() {
        let mut registry: GroupAddressRegistry<8> = GroupAddressRegistry::new();
        registry.register("a", ga(1, 2, 3)).unwrap();
        registry.register("other", ga(0, 0, 1)).unwrap();
        registry.register("b", ga(1, 2, 3)).unwrap();
        registry.register("late", ga(31, 7, 255)).unwrap();
        registry.register("c", ga(1, 2, 3)).unwrap();

        let ids: Vec<&str> = registry.lookup_by_address(ga(1, 2, 3)).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        let ids: Vec<&str> = registry.lookup_by_address(ga(0, 0, 1)).collect();
        assert_eq!(ids, ["other"]);
        assert_eq!(registry.address_count(), 3);
    }

    #[test]
    fn test_capacity() {
        let mut registry: GroupAddressRegistry<2> = GroupAddressRegistry::new();
        registry.register("a", ga(0, 0, 1)).unwrap();
        registry.register("b", ga(0, 0, 2)).unwrap();
        let err = registry.register("c", ga(0, 0, 3)).unwrap_err();
        assert!(matches!(err, KnxError::Registry(ref e) if e.kind() == crate::error::RegistryErrorKind::CapacityExceeded));
        assert_eq!(registry.lookup_by_address(ga(0, 0, 3)).count(), 0);
    }

    #[test]
    fn test_id_too_long() {
        let mut registry: GroupAddressRegistry<2> = GroupAddressRegistry::new();
        let long = "x".repeat(MAX_ID_LEN + 1);
        assert!(registry.register(&long, ga(0, 0, 1)).is_err());
        assert!(registry.register(&long[..MAX_ID_LEN], ga(0, 0, 1)).is_ok());
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_register_str() {
        let mut registry: GroupAddressRegistry<4> = GroupAddressRegistry::new();
        registry.register_str("slash", "1/2/3").unwrap();
        registry.register_str("dot", "1.2.3").unwrap();
        assert_eq!(registry.lookup_by_address(ga(1, 2, 3)).count(), 2);
        assert!(registry.register_str("bad", "1/8/3").unwrap_err().is_address_error());
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_iter_order() {
        let mut registry: GroupAddressRegistry<4> = GroupAddressRegistry::new();
        registry.register("z", ga(5, 0, 0)).unwrap();
        registry.register("a", ga(1, 0, 0)).unwrap();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["z", "a"]);
    }
}
