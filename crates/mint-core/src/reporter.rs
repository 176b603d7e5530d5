//! Reporters: consumidores de `OperationResult` con efectos secundarios.
//!
//! El engine llama a cada reporter tras registrar el resultado. Un error de
//! reporte se loguea y se ignora: nunca cambia el estado de la secuencia.
use log::{error, info};
use std::io::Write;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::operation::OperationResult;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait Reporter: Send {
    fn report(&mut self, result: &OperationResult) -> Result<(), ReportError>;
}

/// Una línea de log por resultado (`info` si tuvo éxito, `error` si no).
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, result: &OperationResult) -> Result<(), ReportError> {
        if result.is_success() {
            info!("{result}");
        } else {
            error!("{result}");
        }
        Ok(())
    }
}

/// Acumula resultados en memoria. `handle()` devuelve el vector compartido
/// para leerlo después de entregar el reporter al engine.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    results: Arc<Mutex<Vec<OperationResult>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<OperationResult>>> {
        Arc::clone(&self.results)
    }

    pub fn snapshot(&self) -> Vec<OperationResult> {
        self.results.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, result: &OperationResult) -> Result<(), ReportError> {
        self.results.lock().unwrap_or_else(|p| p.into_inner()).push(result.clone());
        Ok(())
    }
}

/// Un objeto JSON por línea.
#[derive(Debug)]
pub struct JsonLinesReporter<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Reporter for JsonLinesReporter<W> {
    fn report(&mut self, result: &OperationResult) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
