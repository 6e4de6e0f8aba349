//! Random sample data for demos and tests.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::proto::screen::Resolution;
use crate::proto::{
    keyboard, laptop, memory, screen, storage, Cpu, Gpu, Keyboard, Laptop, Memory, Screen, Storage,
};

/// Generates a random keyboard.
pub fn new_keyboard() -> Keyboard {
    let mut rng = rand::thread_rng();
    let layout = *[
        keyboard::Layout::Qwerty,
        keyboard::Layout::Qwertz,
        keyboard::Layout::Azerty,
    ]
    .choose(&mut rng)
    .unwrap_or(&keyboard::Layout::Qwerty);

    Keyboard {
        layout: layout as i32,
        backlit: rng.gen_bool(0.5),
    }
}

/// Generates a random CPU.
pub fn new_cpu() -> Cpu {
    let mut rng = rand::thread_rng();
    let brand = random_string_from(&["Intel", "AMD"]);
    let name = random_cpu_name(&brand);
    let min_ghz = rng.gen_range(2.0..3.5);
    let max_ghz = rng.gen_range(min_ghz..5.0);

    Cpu {
        brand,
        name,
        number_of_cores: rng.gen_range(2..=8),
        number_of_threads: rng.gen_range(2..=8),
        min_ghz,
        max_ghz,
    }
}

/// Generates a random GPU.
pub fn new_gpu() -> Gpu {
    let mut rng = rand::thread_rng();
    let brand = random_string_from(&["NVIDIA", "AMD"]);
    let name = random_gpu_name(&brand);
    let min_ghz = rng.gen_range(1.0..1.5);
    let max_ghz = rng.gen_range(min_ghz..2.0);

    Gpu {
        brand,
        name,
        min_ghz,
        max_ghz,
        memory: Some(Memory {
            value: rng.gen_range(2..=6),
            unit: memory::Unit::Gigabyte as i32,
        }),
    }
}

/// Generates a random RAM size.
pub fn new_ram() -> Memory {
    Memory {
        value: rand::thread_rng().gen_range(4..=64),
        unit: memory::Unit::Gigabyte as i32,
    }
}

/// Generates a random SSD.
pub fn new_ssd() -> Storage {
    Storage {
        driver: storage::Driver::Ssd as i32,
        memory: Some(Memory {
            value: rand::thread_rng().gen_range(128..=1024),
            unit: memory::Unit::Gigabyte as i32,
        }),
    }
}

/// Generates a random HDD.
pub fn new_hdd() -> Storage {
    Storage {
        driver: storage::Driver::Hdd as i32,
        memory: Some(Memory {
            value: rand::thread_rng().gen_range(1..=6),
            unit: memory::Unit::Terabyte as i32,
        }),
    }
}

/// Generates a random screen.
pub fn new_screen() -> Screen {
    let mut rng = rand::thread_rng();
    let height = rng.gen_range(1080..=4320);
    let panel = if rng.gen_bool(0.5) {
        screen::Panel::Ips
    } else {
        screen::Panel::Oled
    };

    Screen {
        size_inch: rng.gen_range(13.0..17.0),
        resolution: Some(Resolution {
            width: height * 16 / 9,
            height,
        }),
        panel: panel as i32,
        multitouch: rng.gen_bool(0.5),
    }
}

/// Generates a random laptop with a fresh UUID.
pub fn new_laptop() -> Laptop {
    let mut rng = rand::thread_rng();
    let brand = random_string_from(&["Apple", "Dell", "Lenovo"]);
    let name = random_laptop_name(&brand);

    Laptop {
        id: Uuid::new_v4().to_string(),
        brand,
        name,
        cpu: Some(new_cpu()),
        ram: Some(new_ram()),
        gpus: vec![new_gpu()],
        storages: vec![new_ssd(), new_hdd()],
        screen: Some(new_screen()),
        keyboard: Some(new_keyboard()),
        weight: Some(laptop::Weight::WeightKg(rng.gen_range(1.0..3.0))),
        price_usd: rng.gen_range(1500.0..3000.0),
        release_year: rng.gen_range(2015..=2021),
    }
}

/// Generates a random laptop score between 1 and 10.
pub fn random_laptop_score() -> f64 {
    f64::from(rand::thread_rng().gen_range(1..=10))
}

fn random_cpu_name(brand: &str) -> String {
    if brand == "Intel" {
        random_string_from(&[
            "Xeon E-2286M",
            "Core i9-9980HK",
            "Core i7-9750H",
            "Core i5-9400F",
            "Core i3-1005G1",
        ])
    } else {
        random_string_from(&["Ryzen 7 PRO 2700U", "Ryzen 5 PRO 3500U", "Ryzen 3 PRO 3200GE"])
    }
}

fn random_gpu_name(brand: &str) -> String {
    if brand == "NVIDIA" {
        random_string_from(&["RTX 2060", "RTX 2070", "GTX 1050-Ti", "GTX 1660-Ti", "GTX 1070"])
    } else {
        random_string_from(&["RX 590", "RX 580", "RX 5700-XT", "RX Vega-56"])
    }
}

fn random_laptop_name(brand: &str) -> String {
    match brand {
        "Apple" => random_string_from(&["Macbook Air", "Macbook Pro"]),
        "Dell" => random_string_from(&["Latitude", "Vostro", "XPS", "Alienware"]),
        _ => random_string_from(&["Thinkpad X1", "Thinkpad P1", "Thinkpad P53"]),
    }
}

fn random_string_from(set: &[&str]) -> String {
    set.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_laptop_is_complete() {
        let laptop = new_laptop();

        assert!(Uuid::parse_str(&laptop.id).is_ok());
        assert!(laptop.cpu.is_some());
        assert!(laptop.ram.is_some());
        assert!(!laptop.storages.is_empty());
        assert!(laptop.price_usd >= 1500.0);
    }

    #[test]
    fn scores_stay_in_range() {
        for _ in 0..100 {
            let score = random_laptop_score();
            assert!((1.0..=10.0).contains(&score));
        }
    }
}
