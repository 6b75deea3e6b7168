//! Basic example demonstrating fuzzycmeans-rs usage
//!
//! Run with: cargo run --example basic --release

use fuzzycmeans_rs::{FcmConfig, FeatureMatrix, FuzzyCMeans, Metric};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== fuzzycmeans-rs example ===\n");

    // Generate synthetic data: 3 clusters in 2D plus a few points in between
    let n_points = 303;
    let n_features = 2;
    let n_clusters = 3;

    println!("Generating {} points with {} features...", n_points, n_features);

    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];
    let mut values = Array2::<f64>::zeros((n_points, n_features));
    let noise = Array2::random((n_points, n_features), Uniform::new(-1.0, 1.0));

    for i in 0..300 {
        let cluster_idx = i % 3;
        values[[i, 0]] = centers[cluster_idx][0] + noise[[i, 0]];
        values[[i, 1]] = centers[cluster_idx][1] + noise[[i, 1]];
    }
    // Ambiguous points halfway between pairs of centers
    values[[300, 0]] = 0.0;
    values[[300, 1]] = -5.0;
    values[[301, 0]] = -2.5;
    values[[301, 1]] = 0.0;
    values[[302, 0]] = 2.5;
    values[[302, 1]] = 0.0;

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let data = FeatureMatrix::new(values).expect("Invalid feature matrix");

    let config = FcmConfig::new(n_clusters)
        .with_fuzziness(2.0)
        .with_max_iters(100)
        .with_threshold(1e-6)
        .with_seed(42)
        .with_metric(Metric::Euclidean);

    println!("Running fuzzy c-means with k={}...\n", n_clusters);

    let fcm = FuzzyCMeans::with_config(config);
    let result = fcm
        .run(&data, &mut |fraction: f64| {
            if (fraction * 100.0).round() as usize % 10 == 0 {
                println!("  progress: {:.0}%", fraction * 100.0);
            }
        })
        .expect("Clustering failed");

    println!(
        "\nFinished after {} iterations (converged: {}, objective: {:.4})",
        result.n_iterations, result.converged, result.objective
    );

    println!("\nLearned centroids:");
    for (i, centroid) in result.centroids.rows().into_iter().enumerate() {
        println!("  Centroid {}: ({:.4}, {:.4})", i, centroid[0], centroid[1]);
    }
    println!();

    // Count points per dominant cluster
    println!("Cluster distribution (by highest membership):");
    for cluster in &result.clusters {
        let dominant = cluster.dominant_members().count();
        let strong = cluster.members_above(0.8).count();
        println!(
            "  Cluster {}: {} dominant points, {} with membership >= 0.8",
            cluster.index(),
            dominant,
            strong
        );
    }
    println!();

    println!("Ambiguous points:");
    let cluster = &result.clusters[0];
    for id in 300..303 {
        let memberships = cluster
            .membership_vector(&id)
            .expect("Every point has a membership vector");
        println!(
            "  Point {} at ({:.2}, {:.2}) -> {:?}",
            id,
            data.row(id)[0],
            data.row(id)[1],
            memberships
                .iter()
                .map(|u| format!("{:.3}", u))
                .collect::<Vec<_>>()
        );
    }

    println!("\n=== Done! ===");
}
