//! Electrode montage tables for the OpenBCI 16-channel headset
//!
//! Plain lookup tables: channel orderings, the device-label to 10-20 name
//! mapping, and scalp coordinates in metres.

/// Channel order of the OpenBCI 16-channel recordings
pub const OPENBCI_16_CHANNELS: [&str; 16] = [
    "Fp1", "Fp2", "F3", "F4", "F7", "F8", "C3", "C4",
    "T3", "T4", "P3", "P4", "T5", "T6", "O1", "O2",
];

/// Display order used when plotting channels
pub const CHANNEL_NAMES: [&str; 16] = [
    "Fp1", "Fp2", "C3", "C4", "T5", "T6", "O1", "O2",
    "F7", "F8", "F3", "F4", "T3", "T4", "P3", "P4",
];

/// Device channel labels and their 10-20 names
pub const DEVICE_CHANNEL_MAP: [(&str, &str); 16] = [
    ("EEG 1", "Fp1"),
    ("EEG 2", "Fp2"),
    ("EEG 3", "C3"),
    ("EEG 4", "C4"),
    ("EEG 5", "T5"),
    ("EEG 6", "T6"),
    ("EEG 7", "O1"),
    ("EEG 8", "O2"),
    ("EEG 9", "F7"),
    ("EEG 10", "F8"),
    ("EEG 11", "F3"),
    ("EEG 12", "F4"),
    ("EEG 13", "T3"),
    ("EEG 14", "T4"),
    ("EEG 15", "P3"),
    ("EEG 16", "P4"),
];

/// Accelerometer channels recorded alongside EEG on the same board
pub const ACCELEROMETER_CHANNELS: [&str; 3] = ["Accel X", "Accel Y", "Accel Z"];

const ELECTRODE_POSITIONS: [(&str, [f64; 3]); 16] = [
    ("Fp1", [-0.025, 0.09, 0.0]),
    ("Fp2", [0.025, 0.09, 0.0]),
    ("C3", [-0.045, 0.0, 0.0]),
    ("C4", [0.045, 0.0, 0.0]),
    ("T5", [-0.08, -0.05, 0.0]),
    ("T6", [0.08, -0.05, 0.0]),
    ("O1", [-0.025, -0.09, 0.0]),
    ("O2", [0.025, -0.09, 0.0]),
    ("F7", [-0.08, 0.05, 0.0]),
    ("F8", [0.08, 0.05, 0.0]),
    ("F3", [-0.04, 0.045, 0.0]),
    ("F4", [0.04, 0.045, 0.0]),
    ("T3", [-0.095, 0.0, 0.0]),
    ("T4", [0.095, 0.0, 0.0]),
    ("P3", [-0.04, -0.045, 0.0]),
    ("P4", [0.04, -0.045, 0.0]),
];

/// Look up the 10-20 name for a device channel label
pub fn device_to_standard(label: &str) -> Option<&'static str> {
    DEVICE_CHANNEL_MAP
        .iter()
        .find(|(device, _)| *device == label)
        .map(|(_, standard)| *standard)
}

/// Rename device labels to 10-20 names; unknown labels pass through
pub fn rename_channels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            device_to_standard(label).unwrap_or(label).to_string()
        })
        .collect()
}

/// Drop accelerometer channels from a label list, returning kept indices and names
pub fn eeg_channels<S: AsRef<str>>(labels: &[S]) -> Vec<(usize, String)> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !ACCELEROMETER_CHANNELS.contains(&label.as_ref()))
        .map(|(idx, label)| (idx, label.as_ref().to_string()))
        .collect()
}

/// Scalp position of a 10-20 electrode, in metres
pub fn electrode_position(name: &str) -> Option<[f64; 3]> {
    ELECTRODE_POSITIONS
        .iter()
        .find(|(electrode, _)| *electrode == name)
        .map(|(_, position)| *position)
}

/// Owned copy of the OpenBCI channel order, ready to use as row labels
pub fn openbci_channel_names() -> Vec<String> {
    OPENBCI_16_CHANNELS.iter().map(|name| name.to_string()).collect()
}
