//! Compiled-in portfolio catalog.
//!
//! The last stage of the manifest fallback chain: a complete, hand-authored
//! manifest for the four portfolio categories, plus the filename knowledge used
//! when no manifest is available at all (well-known filenames to probe for, and
//! the curated captions that replace raw filenames).

use crate::types::{Category, Manifest, MediaItem};

/// One category of the compiled-in dataset.
struct CatalogCategory {
    key: &'static str,
    folder: &'static str,
    title: &'static str,
    description: &'static str,
    /// `(filename, alt, description)`
    items: &'static [(&'static str, &'static str, &'static str)],
}

const CATALOG: &[CatalogCategory] = &[
    CatalogCategory {
        key: "embedded",
        folder: "Images&videos/Embedded Software Development",
        title: "Embedded Software Development",
        description: "Advanced firmware solutions for industrial applications and IoT devices, delivering robust and scalable embedded systems",
        items: &[
            (
                "STM32 microcontrollers for embedded systems, specifically in Munters dehumidifiers across a diverse range of sizes.png",
                "STM32 Dehumidifiers",
                "STM32 microcontrollers for Munters dehumidifiers across diverse range of sizes",
            ),
            (
                "STM32 and AVR microcontrollers for one of the world's most renowned coffee machines company.png",
                "STM32 Coffee Machine",
                "STM32 and AVR microcontrollers for world's most renowned coffee machines company",
            ),
            (
                "nRF52 microcontrollers with LumenRadio Mira Modules for wireless temperature and humidity sensors and remote controls.jpg",
                "nRF52 Wireless Sensors",
                "nRF52 microcontrollers with LumenRadio Mira Modules for wireless sensors and remote controls",
            ),
            (
                "dsPIC33 of Motor Control drivers.png",
                "dsPIC33 Motor Control",
                "dsPIC33 Motor Control drivers for high-performance applications",
            ),
            (
                "Extensive experience with various microcontroller families applied across a range of commercial products.png",
                "Microcontroller Experience",
                "Extensive experience with various microcontroller families across commercial products",
            ),
        ],
    },
    CatalogCategory {
        key: "pcb",
        folder: "Images&videos/PCB designing",
        title: "Professional PCB Design",
        description: "High-complexity PCB solutions from concept to production, serving global industry leaders and cutting-edge applications",
        items: &[
            (
                "Control board for 4 groups coffee machine. This PCB includes 4 layers, SMD on both sides, PTH on one side. Total of 470 components.png",
                "Coffee Machine Control Board",
                "Control board for 4 groups coffee machine - 4 layers, SMD on both sides, PTH on one side, 470 components total",
            ),
            (
                "Board design for a complex coffee machine PCB.mp4",
                "PCB Design Process",
                "Board design process for complex coffee machine PCB",
            ),
            (
                "High power motor control board. This Board supports Field-Oriented-Control (FOC) algorithm with Power-Factor-Corrector (PFC).jpg",
                "Motor Control Board",
                "High power motor control board supporting Field-Oriented-Control (FOC) and Power-Factor-Corrector (PFC)",
            ),
            (
                "NFC board for high technology coffee machines with AI system for system recognition.png",
                "NFC Board",
                "NFC board for high technology coffee machines with AI system recognition",
            ),
            (
                "Dashboard PCB design to control a stepper motor and RGB LEDs for coffee machines.png",
                "Dashboard PCB",
                "Dashboard PCB design to control stepper motor and RGB LEDs for coffee machines",
            ),
            (
                "PCB for low cost coffee machines attached directly to the machine heater to save space.png",
                "Low Cost PCB",
                "PCB for low cost coffee machines attached directly to machine heater to save space",
            ),
        ],
    },
    CatalogCategory {
        key: "gui",
        folder: "Images&videos/Graphical User Interface Software",
        title: "Industrial GUI & HMI Solutions",
        description: "Professional graphical user interface development for industrial applications",
        items: &[
            (
                "Developed a GUI application by LabVIEW, for coffee machine services and production factories worldwide..png",
                "LabVIEW GUI",
                "LabVIEW GUI application for coffee machine services and production factories worldwide",
            ),
            (
                "PyQT5 application for test box machine simulator.png",
                "PyQT5 Application",
                "PyQT5 application for test box machine simulator with intuitive interface",
            ),
        ],
    },
    CatalogCategory {
        key: "testbox",
        folder: "Images&videos/Test box for systems simulation",
        title: "Hardware-in-the-Loop Testing",
        description: "Complete test automation systems for complex HVAC applications, enabling comprehensive validation and quality assurance",
        items: &[
            (
                "3D model for the case.png",
                "3D Model For The Case",
                "3D model design for the test box case with precision engineering",
            ),
            (
                "Complete test box for complex humidification and dehumidification systems.jpg",
                "Complete Test Box",
                "Complete test box for complex humidification and dehumidification systems",
            ),
        ],
    },
];

/// The complete compiled-in manifest, in catalog order.
pub fn fallback_manifest() -> Manifest {
    CATALOG
        .iter()
        .map(|c| {
            let images = c
                .items
                .iter()
                .map(|(file, alt, desc)| MediaItem::new(format!("{}/{}", c.folder, file), *alt, *desc))
                .collect();
            (
                c.key.to_string(),
                Category {
                    title: c.title.to_string(),
                    description: c.description.to_string(),
                    images,
                },
            )
        })
        .collect()
}

/// Default `(key, folder, title, description)` for each catalog category.
///
/// Seeds the stock `[[categories]]` configuration.
pub fn default_categories() -> impl Iterator<Item = (&'static str, &'static str, &'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|c| (c.key, c.folder, c.title, c.description))
}

/// Every filename the catalog knows about, across all categories.
///
/// The folder-scanning discovery path probes each of these in every category
/// folder, since without a listing there is no other way to learn what exists.
pub fn well_known_filenames() -> Vec<&'static str> {
    CATALOG
        .iter()
        .flat_map(|c| c.items.iter().map(|(file, _, _)| *file))
        .collect()
}

/// Curated caption for a filename stem, if the catalog has one.
pub fn curated_caption(stem: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .flat_map(|c| c.items.iter())
        .find(|(file, _, _)| strip_extension(file) == stem)
        .map(|(_, _, desc)| *desc)
}

fn strip_extension(file: &str) -> &str {
    file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file)
}
