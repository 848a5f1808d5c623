//! Uniform sink that stands in for a linked shader program.

use std::collections::HashMap;

use glam::Mat4;
use orrery_graphics::ShaderUniforms;

/// Logs every uniform write and keeps the last value per name.
#[derive(Debug, Default)]
pub struct LoggingProgram {
    label: String,
    values: HashMap<String, Mat4>,
    write_count: usize,
}

impl LoggingProgram {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Last value written to `name`.
    pub fn uniform(&self, name: &str) -> Option<Mat4> {
        self.values.get(name).copied()
    }

    /// Total writes since creation.
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl ShaderUniforms for LoggingProgram {
    fn set_matrix4(&mut self, name: &str, matrix: &Mat4) {
        log::trace!("{}: set {} = {:?}", self.label, name, matrix.to_cols_array());
        self.values.insert(name.to_string(), *matrix);
        self.write_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_last_value() {
        let mut program = LoggingProgram::new("test");
        program.set_matrix4("MVP", &Mat4::IDENTITY);
        program.set_matrix4("MVP", &Mat4::from_scale(glam::Vec3::splat(2.0)));

        assert_eq!(program.write_count(), 2);
        assert_eq!(
            program.uniform("MVP"),
            Some(Mat4::from_scale(glam::Vec3::splat(2.0)))
        );
        assert_eq!(program.uniform("tint"), None);
    }
}
