//! Device capability descriptor

/// Describes the execution target a queue schedules onto
///
/// Kernels read lane widths from the device to size their work groups: the
/// reduction engine uses `4 * max_sub_group_size()` as its group width, and
/// the broadcast fast path pads its temporary row to the sub-group width.
#[derive(Clone, Debug)]
pub struct Device {
    name: String,
    sub_group_sizes: Vec<usize>,
    compute_units: usize,
    group_collectives: bool,
}

impl Device {
    /// Host device with detected parallelism and default lane widths
    pub fn host() -> Self {
        let compute_units = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            name: "host".to_string(),
            sub_group_sizes: vec![4, 8],
            compute_units,
            group_collectives: true,
        }
    }

    /// Host device with explicit sub-group (lane) widths
    ///
    /// Kernel heuristics derive from the largest width, so pinning it makes
    /// the sequential/parallel reduction cutover deterministic.
    pub fn with_sub_group_sizes(sizes: &[usize]) -> Self {
        let mut device = Self::host();
        device.sub_group_sizes = if sizes.is_empty() {
            vec![1]
        } else {
            sizes.to_vec()
        };
        device
    }

    /// Disable native group collectives, forcing the tree-reduction fallback
    pub fn without_group_collectives(mut self) -> Self {
        self.group_collectives = false;
        self
    }

    /// Human-readable device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reported sub-group (lane) widths
    pub fn sub_group_sizes(&self) -> &[usize] {
        &self.sub_group_sizes
    }

    /// Largest reported sub-group width
    pub fn max_sub_group_size(&self) -> usize {
        self.sub_group_sizes.iter().copied().max().unwrap_or(1)
    }

    /// Number of parallel compute units backing the queue's worker pool
    pub fn compute_units(&self) -> usize {
        self.compute_units
    }

    /// Whether the target exposes native group-wide collective folds
    pub fn group_collectives(&self) -> bool {
        self.group_collectives
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_device() {
        let device = Device::host();
        assert!(device.compute_units() >= 1);
        assert_eq!(device.max_sub_group_size(), 8);
        assert!(device.group_collectives());
    }

    #[test]
    fn test_pinned_sub_group_sizes() {
        let device = Device::with_sub_group_sizes(&[2, 4]);
        assert_eq!(device.max_sub_group_size(), 4);
        let device = Device::with_sub_group_sizes(&[]);
        assert_eq!(device.max_sub_group_size(), 1);
    }

    #[test]
    fn test_collectives_toggle() {
        let device = Device::host().without_group_collectives();
        assert!(!device.group_collectives());
    }
}
