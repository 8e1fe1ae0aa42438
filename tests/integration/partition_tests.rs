//! Tests for reading partitions off a host tree.

use partstat::{
    collection::{
        disks::{PartitionStat, partitions},
        error::Interrupted,
    },
    utils::cancellation_token::{CancellationToken, Interruption},
};

use crate::util::{FILESYSTEMS, FakeHost};

const MOUNTINFO: &str = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro
23 22 0:22 / /sys rw,nosuid,nodev,noexec,noatime shared:7 - sysfs sysfs rw
24 22 0:23 / /proc rw,nosuid,nodev,noexec,relatime shared:13 - proc proc rw
25 22 0:61 / /run rw,nosuid,nodev shared:18 - tmpfs none rw,mode=755
26 22 8:2 / /boot/efi rw,relatime shared:29 - vfat /dev/sda2 rw,fmask=0077
this line is garbage
27 22 0:45 / /tank rw,xattr,noacl shared:30 - zfs tank rw,xattr,noacl
";

fn opts(opts: &[&str]) -> Vec<String> {
    opts.iter().map(|o| o.to_string()).collect()
}

#[test]
fn physical_partitions_from_mountinfo() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file("1/mountinfo", MOUNTINFO);

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    assert_eq!(
        result,
        vec![
            PartitionStat::new("/dev/sda1", "/", "ext4", opts(&["rw", "relatime"])),
            PartitionStat::new("/dev/sda2", "/boot/efi", "vfat", opts(&["rw", "relatime"])),
            PartitionStat::new("tank", "/tank", "zfs", opts(&["rw", "xattr", "noacl"])),
        ]
    );
}

#[test]
fn include_all_skips_filesystems_file() {
    let host = FakeHost::new();
    host.proc_file("1/mountinfo", MOUNTINFO);

    let mut config = host.config();
    config.disk.include_all = true;

    let token = CancellationToken::new();
    let result = partitions(&token, &config).unwrap();

    let mount_points: Vec<_> = result.iter().map(|p| p.mountpoint.as_str()).collect();
    assert_eq!(mount_points, vec!["/", "/sys", "/proc", "/run", "/boot/efi", "/tank"]);
}

#[test]
fn configured_fstypes() {
    let host = FakeHost::new();
    host.proc_file(
        "1/mountinfo",
        "111 80 0:22 / /sys rw,nosuid,nodev,noexec,noatime shared:15 - sysfs sysfs rw\n\
         114 80 0:61 / /run rw,nosuid,nodev shared:18 - tmpfs none rw,mode=755\n",
    );

    let mut config = host.config();
    config.disk.fstypes = Some(vec!["sysfs".into(), "tmpfs".into()]);

    let token = CancellationToken::new();
    let result = partitions(&token, &config).unwrap();

    assert_eq!(
        result,
        vec![PartitionStat::new(
            "sysfs",
            "/sys",
            "sysfs",
            opts(&["rw", "nosuid", "nodev", "noexec", "noatime"])
        )]
    );
}

#[test]
fn falls_back_to_mounts() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS).proc_file(
        "self/mounts",
        "/dev/sda1 / ext4 rw,relatime 0 0\nsysfs /sys sysfs rw,nosuid 0 0\n/dev/sdb1 /data xfs rw 0 2\n",
    );

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    let devices: Vec<_> = result.iter().map(|p| p.device.as_str()).collect();
    assert_eq!(devices, vec!["/dev/sda1", "/dev/sdb1"]);
}

#[test]
fn no_mount_table_at_all() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS);

    let token = CancellationToken::new();
    let err = partitions(&token, &host.config()).unwrap_err();
    assert!(format!("{err:#}").contains("self/mounts"));
}

#[test]
fn missing_filesystems_file() {
    let host = FakeHost::new();
    host.proc_file("1/mountinfo", MOUNTINFO);

    let token = CancellationToken::new();
    assert!(partitions(&token, &host.config()).is_err());
}

#[test]
fn device_mapper_is_resolved() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file(
            "1/mountinfo",
            "30 1 253:0 / / rw,relatime - ext4 /dev/mapper/vg-root rw\n",
        )
        .dev_file("dm-0")
        .dev_link("mapper/vg-root", "../dm-0");

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    assert_eq!(result[0].device, "/dev/dm-0");
}

#[test]
fn absolute_device_mapper_link_stays_in_host_dev() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file(
            "1/mountinfo",
            "30 1 253:0 / / rw,relatime - ext4 /dev/mapper/vg-root rw\n",
        )
        .dev_file("dm-0")
        .dev_link("mapper/vg-root", "/dev/dm-0");

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    assert_eq!(result[0].device, "/dev/dm-0");
}

#[test]
fn dangling_device_mapper_is_kept() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS).proc_file(
        "1/mountinfo",
        "30 1 253:0 / / rw,relatime - ext4 /dev/mapper/gone rw\n",
    );

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    assert_eq!(result[0].device, "/dev/mapper/gone");
}

#[test]
fn dev_root_is_resolved() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file("1/mountinfo", "15 1 259:2 / / ro,relatime - ext4 /dev/root rw\n")
        .sys_link(
            "dev/block/259:2",
            "../../devices/pci0000:00/0000:00:1d.0/nvme/nvme0/nvme0n1/nvme0n1p2",
        );

    let token = CancellationToken::new();
    let result = partitions(&token, &host.config()).unwrap();

    assert_eq!(result[0].device, "/dev/nvme0n1p2");
    assert_eq!(result[0].opts, vec!["ro", "relatime"]);
}

#[test]
fn root_path_scopes_mountinfo() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS).proc_file(
        "1/mountinfo",
        "40 1 8:1 / / rw - ext4 /dev/sda1 rw\n41 40 8:1 /var/lib/box /box rw - ext4 /dev/sda1 rw\n",
    );

    let mut config = host.config();
    config.host.root_path = Some("/var/lib/box".into());

    let token = CancellationToken::new();
    let result = partitions(&token, &config).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].mountpoint, "/box");
}

#[test]
fn host_env_overrides_never_filter_rows() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS).proc_file(
        "1/mountinfo",
        "22 1 8:1 / / rw - ext4 /dev/sda1 rw\n26 22 8:2 / /boot/efi rw - vfat /dev/sda2 rw\n",
    );

    let proc_path = host.root().join("proc");
    let config = host.config().with_env_from(|key| match key {
        "HOST_PROC" => Some(proc_path.clone().into_os_string()),
        "HOST_ROOT" => Some("/host".into()),
        _ => None,
    });

    let token = CancellationToken::new();
    let result = partitions(&token, &config).unwrap();

    let mount_points: Vec<_> = result.iter().map(|p| p.mountpoint.as_str()).collect();
    assert_eq!(mount_points, vec!["/", "/boot/efi"]);
}

#[test]
fn cancelled_token() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file("1/mountinfo", MOUNTINFO);

    let token = CancellationToken::new();
    token.cancel();

    let err = partitions(&token, &host.config()).unwrap_err();
    let interrupted = err.downcast_ref::<Interrupted>().unwrap();
    assert_eq!(interrupted.reason, Interruption::Cancelled);
    assert!(interrupted.partial.is_empty());
}

#[test]
fn cancelled_token_on_fallback() {
    let host = FakeHost::new();
    host.proc_file("filesystems", FILESYSTEMS)
        .proc_file("self/mounts", "/dev/sda1 / ext4 rw 0 0\n");

    let token = CancellationToken::new();
    token.cancel();

    let err = partitions(&token, &host.config()).unwrap_err();
    assert_eq!(err.downcast_ref::<Interruption>(), Some(&Interruption::Cancelled));
}

#[test]
fn partitions_serialize() {
    let partition = PartitionStat::new("/dev/sda1", "/", "ext4", opts(&["rw"]));
    let json = serde_json::to_value(&partition).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "device": "/dev/sda1",
            "mountpoint": "/",
            "fstype": "ext4",
            "opts": ["rw"],
        })
    );
}
