use std::path::{Path, PathBuf};

use cr2_codec::{crop, external, reassemble};

use crate::container::{self, Container};
use crate::error::{Error, Result};

const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// A decoded 2-D sensor image: unsigned 16-bit samples, row-major.
#[derive(Debug, Clone)]
pub struct Image {
    pub data: Vec<u16>,
    pub width: usize,
    pub height: usize,
}

/// Names the external decoder invocation: an executable path and a
/// command template using `{exec}`/`{file}` placeholders. Supplying this
/// is what makes the external adapter "available" to `load()`; reading
/// it from a config file is the CLI's job, not this facade's.
#[derive(Debug, Clone)]
pub struct ExternalDecoder {
    pub exec_path: String,
    pub command_template: String,
}

/// Open/load/close lifecycle over one CR2 file.
pub struct CR2Image {
    path: PathBuf,
    data: Option<Vec<u8>>,
    container: Option<Container>,
    external: Option<ExternalDecoder>,
}

impl CR2Image {
    pub fn open(path: impl AsRef<Path>) -> Result<CR2Image> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file too large: {} bytes (max {MAX_FILE_SIZE})", metadata.len()),
            )));
        }
        let data = std::fs::read(&path)?;
        let container = container::parse(&data)?;
        Ok(CR2Image {
            path,
            data: Some(data),
            container: Some(container),
            external: None,
        })
    }

    pub fn version(&self) -> Result<f64> {
        Ok(self.container()?.version)
    }

    pub fn sensor(&self) -> Result<cr2_core::Sensor> {
        Ok(self.container()?.sensor)
    }

    pub fn exif(&self) -> Result<&cr2_core::Ifd> {
        Ok(&self.container()?.exif)
    }

    /// Opts into the external-decoder path; `load(native=false)` will
    /// prefer this over the native decoder once set.
    pub fn set_external_decoder(&mut self, decoder: ExternalDecoder) {
        self.external = Some(decoder);
    }

    fn container(&self) -> Result<&Container> {
        self.container.as_ref().ok_or(Error::NotOpen)
    }

    /// Decodes the raw image. `ifd=3` is the only implemented path;
    /// `ifd=1` (the embedded preview JPEG) is declared but unimplemented.
    pub fn load(&self, ifd: u32, full_frame: bool, native: bool) -> Result<Image> {
        if ifd == 1 {
            return Err(Error::NotImplemented("embedded JPEG (ifd=1) decoding"));
        }
        if ifd != 3 {
            return Err(Error::NotImplemented("only ifd=3 (raw) is supported"));
        }

        let data = self.data.as_ref().ok_or(Error::NotOpen)?;
        let container = self.container()?;

        if let Some(decoder) = self.external.as_ref().filter(|_| !native) {
            let (samples, width, height) = external::run(
                &decoder.command_template,
                &decoder.exec_path,
                &self.path.to_string_lossy(),
            )?;
            return self.finish(samples, width, height, full_frame, container);
        }

        let strip_start = container.slice.strip_offset as usize;
        let strip_end = strip_start + container.slice.strip_byte_count as usize;
        let strip = data
            .get(strip_start..strip_end)
            .ok_or_else(|| Error::Codec(cr2_codec::Error::CorruptedData("raw strip out of bounds".into())))?;

        let decoded = cr2_codec::decode(strip)?;

        if decoded.width as u32 != container.sensor.width || decoded.height as u32 != container.sensor.height {
            tracing::warn!(
                decoded_width = decoded.width,
                decoded_height = decoded.height,
                sensor_width = container.sensor.width,
                sensor_height = container.sensor.height,
                "decoded raster size disagrees with sensor geometry"
            );
        }

        let widths = container.slice.widths(decoded.width as u32);
        let sensor_image = reassemble::reassemble(&decoded.samples, decoded.height, &widths);
        self.finish(sensor_image, decoded.width, decoded.height, full_frame, container)
    }

    fn finish(
        &self,
        data: Vec<u16>,
        width: usize,
        height: usize,
        full_frame: bool,
        container: &Container,
    ) -> Result<Image> {
        if full_frame {
            return Ok(Image { data, width, height });
        }
        let (cropped, cw, ch) = crop::crop(&data, height, width, &container.sensor)?;
        Ok(Image {
            data: cropped,
            width: cw,
            height: ch,
        })
    }

    pub fn close(&mut self) {
        self.data = None;
        self.container = None;
    }
}
