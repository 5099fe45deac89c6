//! Standardized column mnemonics for image and spectral results.
//!
//! Each mnemonic names a semantic column concept independently of the
//! physical column name a given service happens to use. Image results are
//! identified by UCD; spectral results by utype. The sets are closed and
//! static; declaration order decides ties in reverse lookups.

use crate::table::{MatchKey, StdColumn};

/// Standardized columns of a simple image access (SIA) result, keyed by UCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageColumn {
    // Required columns
    Title,
    Ra,
    Dec,
    Naxes,
    Naxis,
    Scale,
    Format,
    AccessUrl,
    // WCS ("should have")
    Projection,
    Crpix,
    Crval,
    CdMatrix,
    // "Should have" columns
    Instrument,
    MjdObs,
    RefFrame,
    Bandpass,
    BandpassUnit,
    BandpassRefval,
    BandpassHilimit,
    BandpassLolimit,
    PixFlags,
    FileSize,
}

const IMAGE_COLUMNS: &[ImageColumn] = &[
    ImageColumn::Title,
    ImageColumn::Ra,
    ImageColumn::Dec,
    ImageColumn::Naxes,
    ImageColumn::Naxis,
    ImageColumn::Scale,
    ImageColumn::Format,
    ImageColumn::AccessUrl,
    ImageColumn::Projection,
    ImageColumn::Crpix,
    ImageColumn::Crval,
    ImageColumn::CdMatrix,
    ImageColumn::Instrument,
    ImageColumn::MjdObs,
    ImageColumn::RefFrame,
    ImageColumn::Bandpass,
    ImageColumn::BandpassUnit,
    ImageColumn::BandpassRefval,
    ImageColumn::BandpassHilimit,
    ImageColumn::BandpassLolimit,
    ImageColumn::PixFlags,
    ImageColumn::FileSize,
];

impl StdColumn for ImageColumn {
    fn all() -> &'static [Self] {
        IMAGE_COLUMNS
    }

    fn name(&self) -> &'static str {
        match self {
            ImageColumn::Title => "TITLE",
            ImageColumn::Ra => "RA",
            ImageColumn::Dec => "DEC",
            ImageColumn::Naxes => "NAXES",
            ImageColumn::Naxis => "NAXIS",
            ImageColumn::Scale => "SCALE",
            ImageColumn::Format => "FORMAT",
            ImageColumn::AccessUrl => "ACCESS_URL",
            ImageColumn::Projection => "PROJECTION",
            ImageColumn::Crpix => "CRPIX",
            ImageColumn::Crval => "CRVAL",
            ImageColumn::CdMatrix => "CDMATRIX",
            ImageColumn::Instrument => "INSTRUMENT",
            ImageColumn::MjdObs => "MJD_OBS",
            ImageColumn::RefFrame => "REF_FRAME",
            ImageColumn::Bandpass => "BANDPASS",
            ImageColumn::BandpassUnit => "BANDPASS_UNIT",
            ImageColumn::BandpassRefval => "BANDPASS_REFVAL",
            ImageColumn::BandpassHilimit => "BANDPASS_HILIMIT",
            ImageColumn::BandpassLolimit => "BANDPASS_LOLIMIT",
            ImageColumn::PixFlags => "PIXFLAGS",
            ImageColumn::FileSize => "FILESIZE",
        }
    }

    fn key(&self) -> MatchKey {
        MatchKey::Ucd(match self {
            ImageColumn::Title => "VOX:Image_Title",
            ImageColumn::Ra => "POS_EQ_RA_MAIN",
            ImageColumn::Dec => "POS_EQ_DEC_MAIN",
            ImageColumn::Naxes => "VOX:Image_Naxes",
            ImageColumn::Naxis => "VOX:Image_Naxis",
            ImageColumn::Scale => "VOX:Image_Scale",
            ImageColumn::Format => "VOX:Image_Format",
            ImageColumn::AccessUrl => "VOX:Image_AccessReference",
            ImageColumn::Projection => "VOX:WCS_CoordProjection",
            ImageColumn::Crpix => "VOX:WCS_CoordRefPixel",
            ImageColumn::Crval => "VOX:WCS_CoordRefValue",
            ImageColumn::CdMatrix => "VOX:WCS_CDMatrix",
            ImageColumn::Instrument => "INST_ID",
            ImageColumn::MjdObs => "VOX:Image_MJDateObs",
            ImageColumn::RefFrame => "VOX:STC_CoordRefFrame",
            ImageColumn::Bandpass => "VOX:BandPass_ID",
            ImageColumn::BandpassUnit => "VOX:BandPass_Unit",
            ImageColumn::BandpassRefval => "VOX:BandPass_RefValue",
            ImageColumn::BandpassHilimit => "VOX:BandPass_HiLimit",
            ImageColumn::BandpassLolimit => "VOX:BandPass_LoLimit",
            ImageColumn::PixFlags => "VOX:Image_PixFlags",
            ImageColumn::FileSize => "VOX:Image_FileSize",
        })
    }

    fn required(&self) -> bool {
        matches!(
            self,
            ImageColumn::Title
                | ImageColumn::Ra
                | ImageColumn::Dec
                | ImageColumn::Naxes
                | ImageColumn::Naxis
                | ImageColumn::Scale
                | ImageColumn::Format
                | ImageColumn::AccessUrl
        )
    }

    fn description(&self) -> &'static str {
        match self {
            ImageColumn::Title => "Short description of the image (survey, field, bandpass)",
            ImageColumn::Ra => "ICRS right ascension of the center of the image",
            ImageColumn::Dec => "ICRS declination of the center of the image",
            ImageColumn::Naxes => "Number of image axes",
            ImageColumn::Naxis => "Length in pixels of each image axis",
            ImageColumn::Scale => "Scale in degrees per pixel of each image axis",
            ImageColumn::Format => "MIME type of the image product",
            ImageColumn::AccessUrl => "URL used to access or retrieve the image",
            ImageColumn::Projection => "Three-character celestial projection code (FITS WCS)",
            ImageColumn::Crpix => "Image pixel coordinates of the WCS reference pixel",
            ImageColumn::Crval => "World coordinates of the WCS reference pixel",
            ImageColumn::CdMatrix => "WCS CD matrix elements, ordered [1,1] [1,2] [2,1] [2,2]",
            ImageColumn::Instrument => "Instrument used to make the observation",
            ImageColumn::MjdObs => "Mean modified Julian date of the observation",
            ImageColumn::RefFrame => "Coordinate system reference frame (ICRS, FK5, ...)",
            ImageColumn::Bandpass => "Bandpass by name",
            ImageColumn::BandpassUnit => "Units for spectral values (meters, hertz, keV)",
            ImageColumn::BandpassRefval => "Characteristic reference value of the bandpass",
            ImageColumn::BandpassHilimit => "Upper limit of the bandpass",
            ImageColumn::BandpassLolimit => "Lower limit of the bandpass",
            ImageColumn::PixFlags => "Pixel processing flags (copied, filtered, computed, ...)",
            ImageColumn::FileSize => "Actual or estimated size of the encoded image in bytes",
        }
    }
}

/// Standardized columns of a simple spectral access (SSA) result, keyed by
/// utype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectraColumn {
    // Required columns
    AccessUrl,
    Format,
    Title,
    Publisher,
    Length,
    Position,
    Extent,
    // "Should have" columns
    Size,
}

const SPECTRA_COLUMNS: &[SpectraColumn] = &[
    SpectraColumn::AccessUrl,
    SpectraColumn::Format,
    SpectraColumn::Title,
    SpectraColumn::Publisher,
    SpectraColumn::Length,
    SpectraColumn::Position,
    SpectraColumn::Extent,
    SpectraColumn::Size,
];

impl StdColumn for SpectraColumn {
    fn all() -> &'static [Self] {
        SPECTRA_COLUMNS
    }

    fn name(&self) -> &'static str {
        match self {
            SpectraColumn::AccessUrl => "ACCESS_URL",
            SpectraColumn::Format => "FORMAT",
            SpectraColumn::Title => "TITLE",
            SpectraColumn::Publisher => "PUBLISHER",
            SpectraColumn::Length => "LENGTH",
            SpectraColumn::Position => "POSITION",
            SpectraColumn::Extent => "EXTENT",
            SpectraColumn::Size => "SIZE",
        }
    }

    fn key(&self) -> MatchKey {
        MatchKey::Utype(match self {
            SpectraColumn::AccessUrl => "ssa:Access.Reference",
            SpectraColumn::Format => "ssa:Access.Format",
            SpectraColumn::Title => "ssa:DataID.Title",
            SpectraColumn::Publisher => "ssa:Curation.Publisher",
            SpectraColumn::Length => "ssa:Dataset.Length",
            SpectraColumn::Position => "ssa:Char.SpatialAxis.Coverage.Location.Value",
            SpectraColumn::Extent => "ssa:Char.SpatialAxis.Coverage.Bounds.Extent",
            SpectraColumn::Size => "ssa:Access.Size",
        })
    }

    fn required(&self) -> bool {
        !matches!(self, SpectraColumn::Size)
    }

    fn description(&self) -> &'static str {
        match self {
            SpectraColumn::AccessUrl => "URL used to access the dataset",
            SpectraColumn::Format => "MIME type of the dataset",
            SpectraColumn::Title => "Dataset title",
            SpectraColumn::Publisher => "Dataset publisher",
            SpectraColumn::Length => "Number of points in the spectrum",
            SpectraColumn::Position => "Space-separated RA Dec tuple, decimal degrees",
            SpectraColumn::Extent => "Aperture angular diameter, degrees",
            SpectraColumn::Size => "Estimated (not actual) dataset size",
        }
    }
}
