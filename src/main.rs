use anyhow::{Context, Result};
use log::{debug, info};

use raycaster::accelerators::{SphereIndex, TriangleIndex};
use raycaster::{IndexConfig, Point3, Ray, Vec3, scene};

fn report(label: &str, ray: &Ray, hit: raycaster::HitResult) {
    if hit.did_hit {
        println!(
            "{label}: ray from {} along {} HIT primitive {:?} at t = {}",
            ray.origin(),
            ray.direction(),
            hit.primitive,
            hit.distance
        );
    } else {
        println!("{label}: ray from {} along {} MISSED geometry", ray.origin(), ray.direction());
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => IndexConfig::load(&path)
            .with_context(|| format!("could not load index config from {path}"))?,
        None => IndexConfig::default(),
    };
    info!("using {:?}", config);

    let forward = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
    let backward = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let quad = TriangleIndex::with_config(scene::two_triangle_quad().primitives().to_vec(), config)?;
    debug!("triangle tree:\n{}", quad.tree().to_ascii());
    report("triangles", &forward, quad.traverse(&forward));
    report("triangles", &backward, quad.traverse(&backward));

    let spheres = SphereIndex::with_config(scene::three_spheres().primitives().to_vec(), config)?;
    debug!("sphere tree:\n{}", spheres.tree().to_ascii());
    debug!("sphere tree stats: {}", serde_json::to_string_pretty(&spheres.stats())?);
    report("spheres", &forward, spheres.traverse(&forward));
    report("spheres", &backward, spheres.traverse(&backward));
    println!(
        "spheres: anything within t < 3 along {}: {}",
        forward.direction(),
        spheres.occluded(&forward, 3.0)
    );

    Ok(())
}
