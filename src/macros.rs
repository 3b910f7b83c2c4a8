//! Convenience macros for working with KNX addresses and the registry.

/// Creates a [`GroupAddress`](crate::addressing::GroupAddress) from 3-level notation.
///
/// Components are validated at compile time.
///
/// # Examples
///
/// ```
/// use knx_tp::ga;
///
/// let addr = ga!(1/2/3);
/// assert_eq!(addr.raw(), 0x0A03);
/// ```
///
/// ```compile_fail
/// // main group > 31
/// let addr = knx_tp::ga!(32/0/0);
/// ```
///
/// ```compile_fail
/// // middle group > 7
/// let addr = knx_tp::ga!(1/8/0);
/// ```
#[macro_export]
macro_rules! ga {
    ($main:literal / $middle:literal / $sub:literal) => {{
        const _: () = {
            if $main > 31 {
                panic!("Main group must be 0-31");
            }
            if $middle > 7 {
                panic!("Middle group must be 0-7");
            }
            if $sub > 255 {
                panic!("Sub group must be 0-255");
            }
        };

        const RAW: u16 = (($main & 0x1F) << 11) | (($middle & 0x07) << 8) | ($sub & 0xFF);
        $crate::addressing::GroupAddress::from(RAW)
    }};
}

/// Creates a [`PhysicalAddress`](crate::addressing::PhysicalAddress) from
/// `area.line.device` notation, validated at compile time.
///
/// Uses the same 5/3/8 bit layout as group addresses.
///
/// ```
/// use knx_tp::pa;
///
/// let addr = pa!(1 . 1 . 200);
/// assert_eq!(addr.device(), 200);
/// ```
#[macro_export]
macro_rules! pa {
    ($area:literal . $line:literal . $device:literal) => {{
        const _: () = {
            if $area > 31 {
                panic!("Area must be 0-31");
            }
            if $line > 7 {
                panic!("Line must be 0-7");
            }
            if $device > 255 {
                panic!("Device must be 0-255");
            }
        };

        const RAW: u16 = (($area & 0x1F) << 11) | (($line & 0x07) << 8) | ($device & 0xFF);
        $crate::addressing::PhysicalAddress::from(RAW)
    }};
}

/// Registers several symbolic ids in a single block.
///
/// Expands to a closure returning [`Result<()>`](crate::Result) that stops at
/// the first failing registration (duplicate id, full registry).
///
/// ```
/// use knx_tp::{register_group_addresses, registry::GroupAddressRegistry};
///
/// let mut registry: GroupAddressRegistry = GroupAddressRegistry::new();
/// register_group_addresses! {
///     registry,
///     "kitchen_light" => 1/2/3,
///     "kitchen_light_state" => 1/2/4,
/// }?;
/// assert_eq!(registry.len(), 2);
/// # Ok::<(), knx_tp::KnxError>(())
/// ```
#[macro_export]
macro_rules! register_group_addresses {
    ($registry:expr, $( $id:literal => $main:literal / $middle:literal / $sub:literal ),* $(,)?) => {{
        (|| -> $crate::Result<()> {
            $(
                $registry.register($id, $crate::ga!($main / $middle / $sub))?;
            )*
            Ok(())
        })()
    }};
}
