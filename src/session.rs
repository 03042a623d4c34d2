//! Acquisition of one two-port sweep from a network analyzer.
//!
//! The analyzer keeps mutable channel state, so every command is a blocking
//! exchange issued strictly in order and any failure aborts the whole
//! sequence. The transport is released by [`InstrumentSession::close`] or,
//! failing that, on drop.

use crate::config::AcquisitionConfig;
use crate::dataset::SParameterDataset;
use crate::error::SweepError;
use crate::frequency::FrequencySweepPlan;
use crate::scpi::{decode_complex_le, measurement_name, F64_BYTES};
use crate::trace::TraceSelector;
use crate::transport::Transport;
use faer::complex_native::c64;
use log::{debug, info, trace, warn};
use std::time::Duration;

/// Traces in acquisition order with the display window each one feeds
const TRACE_WINDOWS: [(TraceSelector, u8); 4] = [
    (TraceSelector::S11, 1),
    (TraceSelector::S21, 2),
    (TraceSelector::S12, 3),
    (TraceSelector::S22, 4),
];

pub struct InstrumentSession<T: Transport> {
    transport: Option<T>,
    channel: u8,
    source_power_dbm: f64,
    io_timeout: Duration,
    sweep_timeout: Duration,
    identity: String,
}

impl<T: Transport> InstrumentSession<T> {
    /// Takes ownership of the transport and identifies the instrument.
    ///
    /// The transport is closed again if identification fails.
    pub fn open(transport: T, config: &AcquisitionConfig) -> Result<Self, SweepError> {
        config.validate()?;
        let mut session = InstrumentSession {
            transport: Some(transport),
            channel: config.channel,
            source_power_dbm: config.source_power_dbm,
            io_timeout: config.io_timeout(),
            sweep_timeout: config.sweep_timeout(),
            identity: String::new(),
        };

        let io_timeout = session.io_timeout;
        session.transport()?.set_timeout(io_timeout)?;
        let identity = session.query("*IDN?")?;
        info!("Connected to {identity}");
        session.identity = identity;
        Ok(session)
    }

    /// Identification string returned by `*IDN?`
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Configures, triggers and reads back one sweep.
    ///
    /// Nothing is returned unless all four traces decode; the session stays
    /// open after a failure so the caller can still close it.
    pub fn acquire(&mut self, plan: &FrequencySweepPlan) -> Result<SParameterDataset, SweepError> {
        info!(
            "Acquiring {} points from {} Hz to {} Hz",
            plan.npts(),
            plan.start_hz(),
            plan.stop_hz()
        );
        self.reset()?;
        self.define_traces()?;
        self.program_sweep(plan)?;
        self.trigger_and_wait()?;
        let mut traces = self.read_traces(plan.npts())?;

        let s22 = traces.pop().unwrap_or_default();
        let s12 = traces.pop().unwrap_or_default();
        let s21 = traces.pop().unwrap_or_default();
        let s11 = traces.pop().unwrap_or_default();
        let data = SParameterDataset::new(plan.frequencies(), s11, s21, s12, s22)?
            .with_comments(&self.identity);
        info!("Acquisition complete");
        Ok(data)
    }

    /// Idempotent; later calls are no-ops
    pub fn close(&mut self) -> Result<(), SweepError> {
        match self.transport.take() {
            Some(mut transport) => {
                debug!("Closing instrument session");
                transport.close()
            }
            None => Ok(()),
        }
    }

    fn transport(&mut self) -> Result<&mut T, SweepError> {
        self.transport
            .as_mut()
            .ok_or_else(|| SweepError::TransportError("session is closed".to_string()))
    }

    fn write(&mut self, cmd: &str) -> Result<(), SweepError> {
        debug!("{cmd}");
        self.transport()?.write(cmd).map_err(|e| on_exchange(e, cmd))
    }

    fn query(&mut self, cmd: &str) -> Result<String, SweepError> {
        debug!("{cmd}");
        let response = self.transport()?.query(cmd).map_err(|e| on_exchange(e, cmd))?;
        trace!("-> {response}");
        Ok(response)
    }

    fn reset(&mut self) -> Result<(), SweepError> {
        self.write("*RST")?;
        self.write("*CLS")?;
        self.write(&format!("CALC{}:PAR:DEL:ALL", self.channel))
    }

    fn define_traces(&mut self) -> Result<(), SweepError> {
        let ch = self.channel;
        for (trace, window) in TRACE_WINDOWS {
            let name = measurement_name(ch, trace);
            self.write(&format!("DISP:WIND{window}:STAT ON"))?;
            self.write(&format!("CALC{ch}:PAR:DEF \"{name}\", {trace}"))?;
            self.write(&format!("DISP:WIND{window}:TRAC1:FEED \"{name}\""))?;
        }
        Ok(())
    }

    fn program_sweep(&mut self, plan: &FrequencySweepPlan) -> Result<(), SweepError> {
        let ch = self.channel;
        self.write(&format!("SENS{ch}:FREQ:STAR {}", plan.start_hz()))?;
        self.write(&format!("SENS{ch}:FREQ:STOP {}", plan.stop_hz()))?;
        self.write(&format!("SENS{ch}:SWE:POIN {}", plan.npts()))?;
        self.write(&format!("SOUR{ch}:POW {}", self.source_power_dbm))
    }

    fn trigger_and_wait(&mut self) -> Result<(), SweepError> {
        let ch = self.channel;
        self.write(&format!("INIT{ch}:CONT OFF"))?;
        self.write(&format!("INIT{ch}:IMM"))?;

        let sweep_timeout = self.sweep_timeout;
        let io_timeout = self.io_timeout;
        self.transport()?.set_timeout(sweep_timeout)?;
        debug!("*OPC?");
        let done = self.transport()?.query("*OPC?");
        let restored = self.transport()?.set_timeout(io_timeout);

        let done = match done {
            Ok(done) => done,
            Err(SweepError::AcquisitionTimeout(_)) => {
                warn!(
                    "Sweep did not complete within {} ms",
                    sweep_timeout.as_millis()
                );
                return Err(SweepError::AcquisitionTimeout(sweep_timeout));
            }
            Err(e) => return Err(e),
        };
        restored?;
        if done.trim() != "1" {
            return Err(SweepError::TransportError(format!(
                "unexpected *OPC? response '{}'",
                done.trim()
            )));
        }
        Ok(())
    }

    fn read_traces(&mut self, npts: usize) -> Result<Vec<Vec<c64>>, SweepError> {
        let ch = self.channel;
        self.write("FORM:DATA REAL,64")?;
        self.write("FORM:BORD SWAP")?;

        let block_len = 2 * npts * F64_BYTES;
        let mut traces = Vec::with_capacity(TRACE_WINDOWS.len());
        for (trace, _) in TRACE_WINDOWS {
            let name = measurement_name(ch, trace);
            self.write(&format!("CALC{ch}:PAR:SEL \"{name}\""))?;
            let cmd = format!("CALC{ch}:DATA? SDATA");
            debug!("{cmd}");
            let payload = self
                .transport()?
                .query_block(&cmd, block_len)
                .map_err(|e| on_exchange(e, &cmd))?;
            trace!("{trace}: {} bytes", payload.len());
            traces.push(decode_complex_le(&payload, npts)?);
        }
        Ok(traces)
    }
}

// Outside the sweep handshake a timeout is an ordinary transport failure
fn on_exchange(err: SweepError, cmd: &str) -> SweepError {
    match err {
        SweepError::AcquisitionTimeout(timeout) => SweepError::TransportError(format!(
            "no response to '{}' within {} ms",
            cmd,
            timeout.as_millis()
        )),
        other => other,
    }
}

impl<T: Transport> Drop for InstrumentSession<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close instrument session: {e}");
        }
    }
}

/// Opens a session, acquires one sweep and closes the session on every path
pub fn acquire_once<T: Transport>(
    transport: T,
    config: &AcquisitionConfig,
) -> Result<SParameterDataset, SweepError> {
    let plan = config.plan()?;
    let mut session = InstrumentSession::open(transport, config)?;
    let result = session.acquire(&plan);
    let closed = session.close();
    let data = result?;
    closed?;
    Ok(data)
}
