// ABOUTME: Region command implementation.
// ABOUTME: Prints the region code, region id, and upload endpoint of an identifier.

use ocideploy::error::Result;
use ocideploy::output::Output;
use ocideploy::types::{Region, parse_region};
use ocideploy::upload::upload_endpoint;

pub fn region(ocid: &str, output: &Output) -> Result<()> {
    let code = parse_region(ocid)?;
    let region = Region::from_code(&code)?;
    output.result(&format!("region code: {}", region.code()));
    output.result(&format!("region id: {}", region.id()));
    output.result(&format!("upload endpoint: {}", upload_endpoint(ocid)?));
    Ok(())
}
