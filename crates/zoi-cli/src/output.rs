//! Output formatting module

use serde_json::Value;
use zoi_app::UploadResponse;
use zoi_types::{OutputFormat, Result};

pub fn output_response(output_format: OutputFormat, response: &UploadResponse) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(response)?;
        println!("{}", content);
        return Ok(());
    }

    match response {
        UploadResponse::Lookup(body) => {
            println!("\nZoI Lookup");
            println!("==========");
            println!("File:     {}", body.filename);
            println!("Disks:    {}", body.zoi.len());
            println!();
            for (slot, reading) in body.slots.iter().zip(&body.zoi) {
                println!("{:<12} {}", slot, reading.diameter_mm);
            }
        }
        UploadResponse::Detection(body) => {
            println!("\nZoI Detection");
            println!("=============");
            println!("File:     {}", body.filename);
            if let Some(ref url) = body.image_url {
                println!("Image:    {}", url);
            }
            println!();
            match body.zoi {
                Value::Array(ref zones) => {
                    for (idx, zone) in zones.iter().enumerate() {
                        match zone.get("diameter_mm").and_then(Value::as_f64) {
                            Some(mm) => println!("Zone {:<3}  {:.2} mm", idx + 1, mm),
                            None => println!("Zone {:<3}  {}", idx + 1, zone),
                        }
                    }
                }
                ref other => println!("{}", other),
            }
        }
    }

    Ok(())
}
