use anyhow::Result;
use rs3dep::geo_core::{convert_coordinate_list, convert_epsg};

/// Example: converting coordinates between EPSG:4326 and EPSG:3857.
fn main() -> Result<()> {
    println!("=== Example: EPSG conversion ===\n");

    let (lon, lat) = (-93.756155, 41.918015);
    let (x, y) = convert_epsg(lon, lat, 4326)?;
    println!("EPSG:4326 ({}, {}) -> EPSG:3857 ({:.2}, {:.2})", lon, lat, x, y);

    let (back_lon, back_lat) = convert_epsg(x, y, 3857)?;
    println!(
        "EPSG:3857 ({:.2}, {:.2}) -> EPSG:4326 ({:.6}, {:.6})",
        x, y, back_lon, back_lat
    );

    let ring = vec![
        (-93.756155, 41.918015),
        (-93.756155, 41.921429),
        (-93.747334, 41.921429),
    ];
    let converted = convert_coordinate_list(&ring, 4326)?;
    println!("\nConverted ring ({} vertices):", converted.len());
    for (x, y) in &converted {
        println!("  ({:.2}, {:.2})", x, y);
    }

    Ok(())
}
