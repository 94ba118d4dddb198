//! VPD parser entry point
//!
//! Parsing goes:
//! 1. Validate the VHDR header record and its ECC.
//! 2. Follow the VHDR pointer to the VTOC record and check its ECC.
//! 3. Read the VTOC PT keyword for the offsets of the other records.
//! 4. For each supported record, check its name and ECC, then decode its
//!    keywords into the [`Store`].

use std::path::{Path, PathBuf};

use crate::header::{self, Header};
use crate::store::Store;
use crate::toc::{self, TocEntry};
use crate::{hardware, record, Error, Result};

/// Options controlling what a parse keeps
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Process every record listed in the VTOC, not only the supported ones
    pub all_records: bool,
    /// Drop keywords that have no entry in the encoding table
    pub supported_keywords_only: bool,
}

/// Parser over one VPD image
///
/// The image is borrowed for the parser's lifetime and never modified.
/// The EEPROM path is only opened by [`Parser::read_keyword_from_hardware`].
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    image: &'a [u8],
    inventory_path: String,
    eeprom_path: PathBuf,
    start_offset: u32,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a parser
    ///
    /// * `image` - buffer holding the VPD, starting `start_offset` bytes in
    /// * `inventory_path` - FRU inventory path, used when reporting failures
    /// * `eeprom_path` - hardware source for live re-reads
    /// * `start_offset` - where VPD starts inside `image` and inside the EEPROM
    pub fn new(
        image: &'a [u8],
        inventory_path: impl Into<String>,
        eeprom_path: impl Into<PathBuf>,
        start_offset: u32,
    ) -> Self {
        Self {
            image,
            inventory_path: inventory_path.into(),
            eeprom_path: eeprom_path.into(),
            start_offset,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn inventory_path(&self) -> &str {
        &self.inventory_path
    }

    pub fn eeprom_path(&self) -> &Path {
        &self.eeprom_path
    }

    pub fn start_offset(&self) -> u32 {
        self.start_offset
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the image
    ///
    /// Header and VTOC problems are fatal, as is a VTOC entry pointing past
    /// the end of the image. Problems with individual records skip that
    /// record and are listed in [`Store::issues`].
    pub fn run(&self) -> Result<Store> {
        let result = self.parse();
        match &result {
            Ok(store) => tracing::debug!(
                inventory_path = %self.inventory_path,
                records = store.len(),
                issues = store.issues().len(),
                "parsed VPD"
            ),
            Err(e) => tracing::error!(
                inventory_path = %self.inventory_path,
                error = %e,
                "VPD parse failed"
            ),
        }
        result
    }

    /// Validate the VHDR header record only
    pub fn check_header(&self) -> Result<Header> {
        header::validate(self.vpd()?)
    }

    /// Resolve the VTOC entries the parser would process
    pub fn toc(&self) -> Result<Vec<TocEntry>> {
        let vpd = self.vpd()?;
        let header = header::validate(vpd)?;
        toc::resolve(vpd, &header, &self.options)
    }

    /// Read one keyword straight from the EEPROM
    ///
    /// Ignores the cached image: the hardware source is opened, read and
    /// closed within this call. Use it when the cached data may be stale.
    pub fn read_keyword_from_hardware(&self, record: &str, keyword: &str) -> Result<String> {
        tracing::debug!(
            eeprom = %self.eeprom_path.display(),
            record,
            keyword,
            "reading keyword from hardware"
        );
        let live = hardware::read_image(&self.eeprom_path, u64::from(self.start_offset))?;
        hardware::find_keyword(&live, record, keyword)
    }

    fn parse(&self) -> Result<Store> {
        let vpd = self.vpd()?;
        let header = header::validate(vpd)?;
        let entries = toc::resolve(vpd, &header, &self.options)?;

        let mut store = Store::new();
        record::process(vpd, &entries, &self.options, &mut store)?;
        Ok(store)
    }

    /// The image from the start offset on
    fn vpd(&self) -> Result<&'a [u8]> {
        let offset = self.start_offset as usize;
        self.image
            .get(offset..)
            .ok_or(Error::StartOffsetOutOfRange {
                offset,
                len: self.image.len(),
            })
    }
}
