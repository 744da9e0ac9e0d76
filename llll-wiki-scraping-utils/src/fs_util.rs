use std::{
    fmt::Debug,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use fs_err::File;
use serde::{Deserialize, Serialize};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn write_json<P: Into<PathBuf>, T: Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    Ok(serde_json::to_writer_pretty(
        BufWriter::new(File::create(path)?),
        value,
    )?)
}

pub fn read_toml<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<T> {
    let path = path.into();
    (|| toml::from_str(&fs_err::read_to_string(&path)?).map_err(anyhow::Error::new))().with_context(
        || {
            format!(
                "While trying to parse {path:?} as {}",
                std::any::type_name::<T>()
            )
        },
    )
}

/// Reads a headerful CSV file.  A leading UTF-8 byte-order mark is tolerated.
pub fn read_csv<P: Into<PathBuf> + Debug, T: for<'de> Deserialize<'de>>(
    path: P,
) -> anyhow::Result<Vec<T>> {
    let path = path.into();
    (|| {
        csv::Reader::from_reader(BufReader::new(File::open(&path)?))
            .into_deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(anyhow::Error::new)
    })()
    .with_context(|| {
        format!(
            "While trying to read {path:?} as rows of {}",
            std::any::type_name::<T>()
        )
    })
}

/// Writes `rows` as a headerful CSV file, creating parent directories as needed.
/// With `bom` set, the file starts with a UTF-8 byte-order mark so that
/// spreadsheet tools pick the right encoding.
pub fn write_csv<'a, P, T, I>(path: P, rows: I, bom: bool) -> anyhow::Result<()>
where
    P: Into<PathBuf>,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let path = path.into();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(&path)?);
    if bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
