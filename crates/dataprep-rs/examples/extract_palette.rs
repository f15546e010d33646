use anyhow::Result;
use dataprep_rs::image::{extract_colors, histogram, Image};

fn main() -> Result<()> {
    // A synthetic 4x2 RGB gradient.
    let mut data = Vec::new();
    for y in 0..2u8 {
        for x in 0..4u8 {
            data.extend_from_slice(&[x * 60, y * 120, 255 - x * 60]);
        }
    }
    let image = Image::new(4, 2, 3, data)?;

    let palette = extract_colors(&image, 4)?;
    println!("palette:");
    for [r, g, b] in &palette {
        println!("  #{r:02x}{g:02x}{b:02x}");
    }

    let hist = histogram(&image)?;
    let red_row = hist.row(0)?;
    let populated = red_row.iter().filter(|v| v.to_f64() > 0.0).count();
    println!("distinct red values: {populated}");
    Ok(())
}
