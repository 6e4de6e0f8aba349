use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::proto::{memory, Filter, Laptop, Memory};
use crate::{Error, Result};

/// In-memory laptop registry.
///
/// A single read/write lock guards the whole map: `save` takes exclusive
/// access, `find` and `search` take shared access. Reads hand out deep
/// copies; the internal map is never exposed.
pub struct LaptopStore {
    laptops: Arc<RwLock<HashMap<String, Laptop>>>,
}

impl LaptopStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            laptops: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Saves a copy of the laptop, keyed by its identifier.
    ///
    /// Returns [`Error::AlreadyExists`] if the identifier is already taken;
    /// the store is left untouched in that case.
    pub async fn save(&self, laptop: &Laptop) -> Result<()> {
        let mut laptops = self.laptops.write().await;

        if laptops.contains_key(&laptop.id) {
            return Err(Error::AlreadyExists);
        }

        laptops.insert(laptop.id.clone(), laptop.clone());
        Ok(())
    }

    /// Finds a laptop by identifier, returning an independent copy.
    pub async fn find(&self, id: &str) -> Option<Laptop> {
        let laptops = self.laptops.read().await;
        laptops.get(id).cloned()
    }

    /// Scans the store in unspecified order, invoking `found` with a copy of
    /// every laptop matching the filter.
    ///
    /// The shared lock is held for the entire scan, so a slow consumer blocks
    /// concurrent writers. The cancellation token is checked before each
    /// entry; the scan stops on the first callback error.
    pub async fn search<F>(
        &self,
        cancel: &CancellationToken,
        filter: &Filter,
        mut found: F,
    ) -> Result<()>
    where
        F: FnMut(Laptop) -> Result<()>,
    {
        let laptops = self.laptops.read().await;

        for laptop in laptops.values() {
            if cancel.is_cancelled() {
                return Err(Error::Canceled);
            }

            if is_match(filter, laptop) {
                found(laptop.clone())?;
            }
        }

        Ok(())
    }
}

impl Default for LaptopStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LaptopStore {
    fn clone(&self) -> Self {
        Self {
            laptops: Arc::clone(&self.laptops),
        }
    }
}

fn is_match(filter: &Filter, laptop: &Laptop) -> bool {
    if laptop.price_usd > filter.max_price_usd {
        return false;
    }
    if laptop.cpu.as_ref().map_or(0, |cpu| cpu.number_of_cores) < filter.min_cpu_cores {
        return false;
    }
    if laptop.cpu.as_ref().map_or(0.0, |cpu| cpu.min_ghz) < filter.min_cpu_ghz {
        return false;
    }
    if to_bit(laptop.ram.as_ref()) < to_bit(filter.min_ram.as_ref()) {
        return false;
    }

    true
}

/// Normalizes a memory quantity to bits so differently-scaled values compare
/// safely. Each unit is a power-of-two multiple of a bit.
fn to_bit(memory: Option<&Memory>) -> u64 {
    let Some(memory) = memory else {
        return 0;
    };

    let value = memory.value;
    match memory.unit() {
        memory::Unit::Bit => value,
        memory::Unit::Byte => value << 3,
        memory::Unit::Kilobyte => value << 13,
        memory::Unit::Megabyte => value << 23,
        memory::Unit::Gigabyte => value << 33,
        memory::Unit::Terabyte => value << 43,
        memory::Unit::Unknown => 0,
    }
}
