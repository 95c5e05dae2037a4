use std::io::Write;

use anyhow::Result;

use crate::{
    cache::{AccessResult, DirectMappedCache},
    stat::Report,
};

/// feeds addresses into a cache in order, writing one `<address> Hit|Miss`
/// line per access to `out`.
pub struct Simulator<'c, W> {
    cache: &'c mut DirectMappedCache,
    out: W,
    cycle: usize,
}

impl<'c, W: Write> Simulator<'c, W> {
    pub fn new(cache: &'c mut DirectMappedCache, out: W) -> Self {
        Self {
            cache,
            out,
            cycle: 0,
        }
    }
    pub fn single_access(&mut self, address: u64) -> Result<AccessResult> {
        let result = self.cache.access(address);
        log::trace!(
            "#{} {address} -> line {}: {result}",
            self.cycle,
            self.cache.index_of(address)
        );
        self.cycle += 1;
        writeln!(self.out, "{address} {result}")?;
        Ok(result)
    }
    pub fn run(&mut self, addresses: impl IntoIterator<Item = u64>) -> Result<()> {
        for address in addresses {
            self.single_access(address)?;
        }
        self.out.flush()?;
        Ok(())
    }
    /// number of accesses driven through this simulator.
    pub fn cycle(&self) -> usize {
        self.cycle
    }
    pub fn report(&self) -> Report {
        self.cache.statistics()
    }
    pub fn into_output(self) -> W {
        self.out
    }
}

pub fn simulate(
    cache: &mut DirectMappedCache,
    addresses: impl IntoIterator<Item = u64>,
    out: impl Write,
) -> Result<Report> {
    let mut sim = Simulator::new(cache, out);
    sim.run(addresses)?;
    log::info!("finished simulation of {} accesses.", sim.cycle());
    Ok(sim.report())
}
