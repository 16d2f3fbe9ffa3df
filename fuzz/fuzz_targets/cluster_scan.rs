#![no_main]

use clusterperm::{find_clusters, ClusterConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick margin and minimum size, the rest are frames
    let config = ClusterConfig {
        threshold: 0.05,
        merge_margin: (data[0] % 8) as usize,
        min_cluster_size: (data[1] % 4) as usize,
    };
    let p: Vec<f64> = data[2..]
        .iter()
        .map(|&b| if b == 255 { f64::NAN } else { b as f64 / 254.0 })
        .collect();
    let t: Vec<f64> = data[2..].iter().map(|&b| b as f64 - 127.0).collect();

    let clusters = find_clusters(&p, &t, &config).expect("valid config and equal lengths");
    for c in &clusters {
        assert!(c.onset <= c.offset && c.offset < p.len());
        assert!(c.offset - c.onset >= config.min_cluster_size);
    }
    for w in clusters.windows(2) {
        assert!(w[1].onset > w[0].offset + 1 + config.merge_margin);
    }
});
