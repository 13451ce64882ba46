use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skytract::errors::SkyResult;
use skytract::{Catalog, CatalogMetadata, PointFrame, RingsSkyMap, RingsSkyMapConfig};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Grid spacing of the small sky fixture, in degrees.
pub const SMALL_SKY_SPACING: f64 = 0.05;

/// Runs a test against a freshly built context.
///
/// Errors from either closure fail the test with their full description.
pub fn run_test<T, B>(before: B, test: T)
where
    B: Fn() -> SkyResult<TestContext>,
    T: Fn(TestContext) -> SkyResult<()>,
{
    let start = Instant::now();
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };
    if let Err(e) = test(ctx) {
        panic!("Test failed after {:?}: {:?}", start.elapsed(), e);
    }
    log::debug!("Test passed in {:?}", start.elapsed());
}

#[derive(Clone)]
pub struct TestContext {
    skymap: Arc<RingsSkyMap>,
    catalog: Catalog,
    frame: PointFrame,
}

impl TestContext {
    pub fn new(skymap: Arc<RingsSkyMap>, catalog: Catalog, frame: PointFrame) -> Self {
        Self {
            skymap,
            catalog,
            frame,
        }
    }

    pub fn skymap(&self) -> Arc<RingsSkyMap> {
        Arc::clone(&self.skymap)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Every row of the catalog, unpartitioned.
    pub fn frame(&self) -> &PointFrame {
        &self.frame
    }
}

/// A skymap with the default rings layout.
pub fn create_skymap() -> SkyResult<Arc<RingsSkyMap>> {
    Ok(Arc::new(RingsSkyMap::with_name(
        "lsst_cells_v1",
        RingsSkyMapConfig::default(),
    )?))
}

/// Rows of the small sky fixture.
///
/// A regular grid covers RA [330, 345) and Dec [-72, -62) with
/// [`SMALL_SKY_SPACING`] between rows, which holds tract 792 of the default
/// skymap. A seeded random cluster around RA 15, Dec 5 adds rows elsewhere.
pub fn small_sky_frame(metadata: &CatalogMetadata) -> SkyResult<PointFrame> {
    let mut ids = Vec::new();
    let mut ra = Vec::new();
    let mut dec = Vec::new();

    let nx = (15.0 / SMALL_SKY_SPACING).round() as usize;
    let ny = (10.0 / SMALL_SKY_SPACING).round() as usize;
    for i in 0..nx {
        for j in 0..ny {
            ids.push(ids.len() as u64);
            ra.push(330.0 + i as f64 * SMALL_SKY_SPACING);
            dec.push(-72.0 + j as f64 * SMALL_SKY_SPACING);
        }
    }

    let mut rng = StdRng::seed_from_u64(131);
    for _ in 0..2000 {
        ids.push(ids.len() as u64);
        ra.push(rng.gen_range(10.0..20.0));
        dec.push(rng.gen_range(0.0..10.0));
    }

    let magnitudes = (0..ids.len()).map(|i| 18.0 + (i % 70) as f64 * 0.1).collect();
    PointFrame::from_positions(ids, ra, dec, metadata)?.with_column("mag", magnitudes)
}

pub fn create_small_sky_context() -> SkyResult<TestContext> {
    let metadata = CatalogMetadata::new("small_sky").with_partition_depth(7);
    let frame = small_sky_frame(&metadata)?;
    let catalog = Catalog::from_frame(metadata, frame.clone())?;
    Ok(TestContext::new(create_skymap()?, catalog, frame))
}

/// Row ids of a frame as a set.
pub fn id_set(frame: &PointFrame) -> BTreeSet<u64> {
    frame.ids().iter().copied().collect()
}
