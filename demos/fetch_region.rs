use anyhow::Result;
use rs3dep::collect::usgs::UsgsCollect;

/// Example: building a pipeline request for a section of the Iowa dataset
/// and probing the remote EPT metadata.
fn main() -> Result<()> {
    println!("=== Example: USGS 3DEP fetch request ===\n");

    // Section near Des Moines, Iowa (lon, lat in EPSG:4326)
    let coordinates = vec![
        (-93.756155, 41.918015),
        (-93.756155, 41.921429),
        (-93.747334, 41.921429),
        (-93.747334, 41.918015),
    ];

    let collector = UsgsCollect::new(&coordinates, "IA_FullState")?;

    println!("Region: {}", collector.region());
    println!("Bucket: {}", collector.url());
    println!(
        "CRS: EPSG:{} (storage) -> EPSG:{} (output)\n",
        collector.in_epsg(),
        collector.out_epsg()
    );

    let request = collector.build_request()?;
    println!("Parameterized pipeline request:");
    println!("{:#}", request.to_json());

    // Remote probe; needs network access
    println!("\nFetching EPT metadata...");
    match collector.ept_metadata() {
        Ok(metadata) => {
            println!("  - Points: {}", metadata.points);
            println!("  - Span: {}", metadata.span);
            println!("  - Bounds: {:?}", metadata.bounds);
            if let Some(epsg) = metadata.horizontal_epsg() {
                println!("  - Storage CRS: EPSG:{}", epsg);
            }
        }
        Err(e) => println!("  - Metadata unavailable: {}", e),
    }

    Ok(())
}
