use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

/// Writes a zip fixture. Names ending in `/` become directory entries.
pub(crate) fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut zw = ZipWriter::new(File::create(path).unwrap());
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in entries {
        if name.ends_with('/') {
            zw.add_directory(*name, opts).unwrap();
        } else {
            zw.start_file(*name, opts).unwrap();
            zw.write_all(bytes.as_bytes()).unwrap();
        }
    }
    zw.finish().unwrap();
}

/// All entries in archive order.
pub(crate) fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut zip = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut zf = zip.by_index(i).unwrap();
            let mut buf = Vec::new();
            zf.read_to_end(&mut buf).unwrap();
            (zf.name().to_string(), buf)
        })
        .collect()
}
