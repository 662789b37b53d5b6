//! Static department-code lookup.
//!
//! The middle segment of a full roll number (`2K19/CO/123` → `CO`) names the
//! student's department. The table below is reference data collected from
//! published result sheets; an unmapped code must surface as an error so an
//! unexpected program shows up in auditing instead of silently exporting an
//! empty department.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// Error for a roll-number department code absent from the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" does not have a defined department name")]
pub struct UnknownDepartment(pub String);

const TABLE: &[(&str, &str)] = &[
    ("CO", "Computer Engineering"),
    ("SE", "Software Engineering"),
    ("IT", "Information Technology"),
    ("MC", "Mathematics and Computing"),
    ("EC", "Electronics and Communication Engineering"),
    ("EL", "Electrical and Electronics Engineering"),
    ("EE", "Electrical Engineering"),
    ("EP", "Engineering Physics"),
    ("ME", "Mechanical Engineering"),
    ("PE", "Production and Industrial Engineering"),
    ("BT", "Biotechnology"),
    ("CH", "Chemical Engineering"),
    ("PS", "Polymer Science and Technology"),
    ("CE", "Civil Engineering"),
    ("EN", "Environmental Engineering"),
    ("AE", "Automobile Engineering"),
    // Continuing-education sections
    ("CEEC", "Electronics and Communication Engineering (Continuing Education)"),
    ("CEEE", "Electrical Engineering (Continuing Education)"),
    ("CEME", "Mechanical Engineering (Continuing Education)"),
    ("CECE", "Civil Engineering (Continuing Education)"),
    // Postgraduate programmes
    ("PTE", "Polymer Technology"),
    ("MST", "Material Science and Technology"),
    ("NST", "Nano Science and Technology"),
    ("BIO", "Bioinformatics"),
    ("BME", "Bio Medical Engineering"),
    ("IBT", "Industrial Biotechnology"),
    ("GTE", "Geotechnical Engineering"),
    ("HRE", "Hydraulics & Water Resources Engineering"),
    ("HFE", "Hydraulics & Water Resources Engineering"),
    ("STE", "Structural Engineering"),
    ("GINF", "Geoinformatics"),
    ("GEO", "Geoinformatics"),
    ("CSE", "Computer Science & Engineering"),
    ("AI", "Artificial Intelligence"),
    ("AFI", "Artificial Intelligence"),
    ("MOC", "Microwave & Optical Communication Engineering"),
    ("SPD", "Signal Processing & Digital Design"),
    ("VLS", "VLSI Design and Embedded System"),
    ("C&I", "Control and Instrumentation"),
    ("PSY", "Power System"),
    ("PES", "Power Electronics and Systems"),
    ("ENE", "Environmental Engineering"),
    ("ISY", "Information Systems"),
    ("PRD", "Production Engineering"),
    ("PIE", "Production Engineering"),
    ("THE", "Thermal Engineering"),
    ("CAAD", "Computer Aided Analysis and Design"),
    ("CDN", "Computational Design"),
    ("ESM", "Energy Systems and Management"),
    ("IEM", "Industrial Engineering and Management"),
    ("SWE", "Software Engineering"),
    ("DS", "Data Science"),
    ("DSC", "Data Science"),
    // M.Sc.
    ("MSCCHE", "Master of Science in Chemistry"),
    ("MSCMAT", "Master of Science in Mathematics"),
    ("MSCPHY", "Master of Science in Physics"),
    ("MSCBIO", "Master of Science in BioTechnology"),
    // Design
    ("BD", "Bachelor of Design"),
    ("MDID", "Master of Design in Interaction Design"),
    // TODO: confirm the Lifestyle and Accessory Design code with a newer sheet
    ("MDLA", "Master of Design in Lifestyle and Accessory Design"),
    ("MDPD", "Master of Design in Product Design"),
    ("MDTD", "Master of Design in Transportation and Service Design"),
    ("MDVC", "Master of Design in Visual Communication"),
    // Economics
    ("BAE", "Bachelor of Arts (Honours) in Economics"),
    ("MAE", "Master of Arts in Economics"),
    // Management
    ("EMBA", "Master of Business Administration (Executive)"),
    ("BMBA", "Master of Business Administration (Business Analytics)"),
    ("FMBA", "Master of Business Administration (Family Business & Entrepreneurship)"),
    (
        "IMBA",
        "Master of Business Administration (Innovation, Entrepreneurship & Venture Development)",
    ),
    ("DMBA", "Master of Business Administration"),
    ("UMBA", "Master of Business Administration"),
    ("MBA", "Master of Business Administration"),
    ("BBA", "Bachelor of Business Administration"),
];

fn table() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| TABLE.iter().copied().collect())
}

/// Full department name for a roll-number code.
pub fn department_name(code: &str) -> Result<&'static str, UnknownDepartment> {
    table()
        .get(code)
        .copied()
        .ok_or_else(|| UnknownDepartment(code.to_string()))
}
