use anyhow::{Context, Result};
use std::{fs::File, io::BufReader, path::Path};

use zip::ZipArchive;

pub fn list_entries(archive: &Path) -> Result<()> {
    let f = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(f))
        .with_context(|| format!("read zip directory of {}", archive.display()))?;

    let mut total = 0u64;
    for i in 0..zip.len() {
        let zf = zip
            .by_index(i)
            .with_context(|| format!("entry #{i} of {}", archive.display()))?;
        total += zf.size();
        println!("{:>10}  {}", zf.size(), zf.name());
    }
    println!("{} entries, {} bytes", zip.len(), total);
    Ok(())
}
