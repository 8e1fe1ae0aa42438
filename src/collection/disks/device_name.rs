use std::borrow::Cow;

const NVME_PREFIX: &str = "nvme";

/// Collapses an NVMe controller-path name (`nvme<N>c<M>n<K>...`) into the
/// per-namespace name (`nvme<N>n<K>...`) so I/O counters for both land under
/// one key.
///
/// Anything that isn't in that shape comes back untouched, so this is safe to
/// run on every device name, and running it twice is the same as once.
///
/// ```
/// use partstat::collection::disks::normalize_device_name;
///
/// assert_eq!(normalize_device_name("nvme0c0n1"), "nvme0n1");
/// assert_eq!(normalize_device_name("nvme0n1p1"), "nvme0n1p1");
/// assert_eq!(normalize_device_name("sda"), "sda");
/// ```
pub fn normalize_device_name(name: &str) -> Cow<'_, str> {
    if !name.starts_with(NVME_PREFIX) {
        return Cow::Borrowed(name);
    }

    // The `c` must come after the prefix, and there must be a namespace
    // (`n`) somewhere after it.
    let Some(c_idx) = name.find('c').filter(|&idx| idx > NVME_PREFIX.len()) else {
        return Cow::Borrowed(name);
    };
    let Some(n_offset) = name[c_idx..].find('n') else {
        return Cow::Borrowed(name);
    };

    let mut normalized = String::with_capacity(name.len());
    normalized.push_str(&name[..c_idx]);
    normalized.push_str(&name[c_idx + n_offset..]);

    Cow::Owned(normalized)
}
