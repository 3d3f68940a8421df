/// Rounds `value` up to the next multiple of `multiple`, or `None` past `u32::MAX`.
pub fn round_up_to_multiple(value: u32, multiple: u32) -> Option<u32> {
    value.div_ceil(multiple).checked_mul(multiple)
}

/// Size of a 1D compute dispatch covering a number of work items.
///
/// The global size is rounded up to a whole number of work groups. When the group
/// count exceeds the per-dimension limit the groups are folded into a second
/// dimension; the kernel linearises `(x, y)` back into a single index and skips
/// anything past `work_items`. Sizes that cannot be expressed in `u32` or in two
/// dimensions of groups give `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSize {
    pub work_items: u32,
    pub global_size: u32,
    pub group_size: u32,
    pub groups_x: u32,
    pub groups_y: u32,
}

impl DispatchSize {
    pub fn cover(
        work_items: u32,
        group_size: u32,
        max_groups_per_dimension: u32,
    ) -> Option<Self> {
        let global_size = round_up_to_multiple(work_items, group_size)?;
        let groups = global_size / group_size;

        let (groups_x, groups_y) = if groups == 0 {
            (0, 0)
        } else {
            let groups_x = groups.min(max_groups_per_dimension);
            (groups_x, groups.div_ceil(groups_x))
        };
        if groups_y > max_groups_per_dimension {
            return None;
        }

        Some(Self {
            work_items,
            global_size,
            group_size,
            groups_x,
            groups_y,
        })
    }

    /// Invocations actually launched, including the guarded tail.
    pub fn invocations(&self) -> u64 {
        self.groups_x as u64 * self.groups_y as u64 * self.group_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up() {
        assert_eq!(round_up_to_multiple(64, 64), Some(64));
        assert_eq!(round_up_to_multiple(65, 64), Some(128));
        assert_eq!(round_up_to_multiple(1, 64), Some(64));
        assert_eq!(round_up_to_multiple(0, 64), Some(0));
    }

    #[test]
    fn test_round_up_near_u32_max() {
        assert_eq!(round_up_to_multiple(u32::MAX - 63, 64), Some(u32::MAX - 63));
        assert_eq!(round_up_to_multiple(u32::MAX - 10, 64), None);
        assert!(DispatchSize::cover(u32::MAX - 10, 64, 65_535).is_none());
    }

    #[test]
    fn test_too_many_groups_for_two_dimensions() {
        assert!(DispatchSize::cover(64 * 17, 64, 4).is_none());
        assert_eq!(DispatchSize::cover(64 * 16, 64, 4).unwrap().groups_y, 4);
    }

    #[test]
    fn test_exact_multiple_is_not_padded() {
        let size = DispatchSize::cover(1280 * 720, 64, 65_535).unwrap();
        assert_eq!(size.global_size, 1280 * 720);
        assert_eq!(size.groups_x, 14_400);
        assert_eq!(size.groups_y, 1);
    }

    #[test]
    fn test_ragged_size_is_over_dispatched() {
        let size = DispatchSize::cover(100 * 75, 64, 65_535).unwrap();
        assert_eq!(size.global_size, 7_552);
        assert!(size.invocations() >= 7_500);
    }

    #[test]
    fn test_large_dispatch_folds_into_second_dimension() {
        let size = DispatchSize::cover(3840 * 2160, 64, 65_535).unwrap();
        assert_eq!(size.global_size, 3840 * 2160);
        assert_eq!(size.groups_x, 65_535);
        assert_eq!(size.groups_y, 2);
        assert!(size.invocations() >= size.global_size as u64);
    }

    #[test]
    fn test_empty_dispatch() {
        let size = DispatchSize::cover(0, 64, 65_535).unwrap();
        assert_eq!(size.invocations(), 0);
    }
}
