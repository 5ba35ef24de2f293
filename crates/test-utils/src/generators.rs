//! Generators for synthetic time series configuration.

/// `count` timestamps one day apart starting at 2021-01-01T10:00:00Z.
///
/// # Example
///
/// ```
/// use test_utils::daily_timestamps;
///
/// let times = daily_timestamps(3);
/// assert_eq!(times[0], "2021-01-01T10:00:00Z");
/// assert_eq!(times[2], "2021-01-03T10:00:00Z");
/// ```
pub fn daily_timestamps(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("2021-01-{:02}T10:00:00Z", i + 1))
        .collect()
}

/// Endpoint YAML with one entry per timestamp, each with its own COG key.
///
/// Timestamps are emitted verbatim so malformed values can be tested.
pub fn time_series_endpoint_yaml(times: &[&str]) -> String {
    let mut yaml = String::from(
        "EndPoint: https://titiler.example.com\n\
         S3Bucket: earthdaily-demo\n\
         Bands: [1, 2, 3]\n\
         Rescale: [-50, 350]\n\
         Bbox: [-115.2, 32.0, -114.0, 33.2]\n\
         TimeEntries:\n",
    );
    for (i, time) in times.iter().enumerate() {
        yaml.push_str(&format!(
            "  - Time: \"{}\"\n    S3Key: scenes/{}/RGB.tif\n",
            time, i
        ));
    }
    yaml
}
