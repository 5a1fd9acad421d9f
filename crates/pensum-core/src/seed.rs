//! # Bundled Default Dataset
//!
//! The curriculum a fresh board starts from when no persisted state
//! exists. Seeding keeps only the first [`SEED_SEMESTERS`] semesters of
//! the full program so a new user starts with a small, editable board.

use crate::board::CurriculumBoard;
use crate::limits::SEED_SEMESTERS;
use crate::types::{Axis, AxisColor, ProgramInfo, Subject, SubjectDetails, SyllabusUnit};

/// Default program metadata.
#[must_use]
pub fn default_program() -> ProgramInfo {
    ProgramInfo {
        program: "Nanociencia y Nanotecnología".to_string(),
        version: "1.0".to_string(),
        institution: "UMNG".to_string(),
        email: None,
    }
}

/// The default thematic axes.
#[must_use]
pub fn default_axes() -> Vec<Axis> {
    let axis = |id: &str, name: &str, label: &str, color: AxisColor| Axis {
        id: id.to_string(),
        name: name.to_string(),
        label: label.to_string(),
        color,
    };

    vec![
        axis("eje-bas", "Básico (Física y Matemáticas)", "BAS", AxisColor::Indigo),
        axis("eje-qui", "Química y Materiales", "QUI", AxisColor::Emerald),
        axis("eje-nan", "Nanociencia", "NAN", AxisColor::Cyan),
        axis("eje-ing", "Ingeniería Aplicada", "ING", AxisColor::Amber),
        axis("eje-hum", "Humanidades e Investigación", "HUM", AxisColor::Rose),
        axis("eje-ele", "Electivas", "ELE", AxisColor::Violet),
    ]
}

/// The complete bundled curriculum, all semesters.
#[must_use]
pub fn full_curriculum() -> Vec<Subject> {
    let subject = |id: &str, name: &str, semester: u32, axis: &str, prereqs: &[&str], coreqs: &[&str]| {
        Subject {
            id: id.to_string(),
            name: name.to_string(),
            semester,
            axis_name: axis.to_string(),
            prerequisites: prereqs.iter().map(|p| (*p).to_string()).collect(),
            corequisites: coreqs.iter().map(|c| (*c).to_string()).collect(),
            details: None,
        }
    };

    const BAS: &str = "Básico (Física y Matemáticas)";
    const QUI: &str = "Química y Materiales";
    const NAN: &str = "Nanociencia";
    const ING: &str = "Ingeniería Aplicada";
    const HUM: &str = "Humanidades e Investigación";
    const ELE: &str = "Electivas";

    let mut subjects = vec![
        // Semestre 1
        subject("MAT1", "Cálculo Diferencial", 1, BAS, &[], &[]),
        subject("FIS1", "Física Mecánica", 1, BAS, &[], &["MAT1"]),
        subject("QUI1", "Química General", 1, QUI, &[], &[]),
        subject("INT1", "Introducción a la Nanociencia", 1, NAN, &[], &[]),
        subject("HUM1", "Cátedra Institucional", 1, HUM, &[], &[]),
        // Semestre 2
        subject("MAT2", "Cálculo Integral", 2, BAS, &["MAT1"], &[]),
        subject("FIS2", "Electricidad y Magnetismo", 2, BAS, &["FIS1"], &["MAT2"]),
        subject("QUI2", "Química Inorgánica", 2, QUI, &["QUI1"], &[]),
        subject("BIO1", "Biología Celular", 2, QUI, &[], &[]),
        subject("HUM2", "Metodología de la Investigación", 2, HUM, &["HUM1"], &[]),
        // Semestre 3
        subject("MAT3", "Ecuaciones Diferenciales", 3, BAS, &["MAT2"], &[]),
        subject("FIS3", "Física Moderna", 3, BAS, &["FIS2"], &[]),
        subject("QUI3", "Química Orgánica", 3, QUI, &["QUI2"], &[]),
        subject("NAN1", "Fundamentos de Nanomateriales", 3, NAN, &["QUI2", "FIS2"], &[]),
        // Semestre 4
        subject("MAT4", "Métodos Numéricos", 4, BAS, &["MAT3"], &[]),
        subject("FIS4", "Mecánica Cuántica", 4, BAS, &["FIS3", "MAT3"], &[]),
        subject("NAN2", "Caracterización de Nanomateriales", 4, NAN, &["NAN1"], &[]),
        subject("QUI4", "Fisicoquímica", 4, QUI, &["QUI3", "MAT3"], &[]),
        // Semestre 5
        subject("NAN3", "Nanofabricación", 5, NAN, &["NAN2"], &[]),
        subject("FIS5", "Estado Sólido", 5, BAS, &["FIS4"], &[]),
        subject("ELE1", "Electiva I", 5, ELE, &[], &[]),
        // Semestre 6
        subject("NAN4", "Nanobiotecnología", 6, NAN, &["NAN3", "BIO1"], &[]),
        subject("ING1", "Instrumentación Científica", 6, ING, &["FIS5"], &[]),
        subject("ELE2", "Electiva II", 6, ELE, &["ELE1"], &[]),
        // Semestre 7
        subject("NAN5", "Nanoelectrónica", 7, NAN, &["NAN3", "FIS5"], &[]),
        subject("ING2", "Simulación de Materiales", 7, ING, &["MAT4"], &[]),
        // Semestre 8
        subject("NAN6", "Nanomedicina", 8, NAN, &["NAN4"], &[]),
        subject("ING3", "Gestión de Proyectos Tecnológicos", 8, ING, &["HUM2"], &[]),
        // Semestre 9
        subject("SEM1", "Seminario de Investigación", 9, HUM, &["HUM2"], &[]),
        subject("PRA1", "Práctica Profesional", 9, ING, &["ING3"], &[]),
        // Semestre 10
        subject("TGR1", "Trabajo de Grado", 10, HUM, &["SEM1"], &[]),
    ];

    // The introductory course carries bundled details as a filled-in example.
    if let Some(intro) = subjects.iter_mut().find(|s| s.id == "INT1") {
        intro.details = Some(SubjectDetails {
            title: Some("Introducción a la Nanociencia".to_string()),
            justification: "Presenta el campo de la nanociencia, su historia y sus \
                            aplicaciones, y motiva la estructura del resto del plan de \
                            estudios."
                .to_string(),
            syllabus: vec![SyllabusUnit {
                unit: "Unidad 1: La escala nanométrica".to_string(),
                topics: "Dimensiones características; efectos de superficie; ejemplos \
                         naturales y artificiales"
                    .to_string(),
                objectives: "Reconocer los fenómenos que emergen a escala nanométrica"
                    .to_string(),
                sources: "Ratner & Ratner, Nanotechnology: A Gentle Introduction".to_string(),
            }],
        });
    }

    subjects
}

/// Build the board a brand-new session starts from: the bundled dataset
/// restricted to the first [`SEED_SEMESTERS`] semesters.
#[must_use]
pub fn seed_board() -> CurriculumBoard {
    let subjects = full_curriculum()
        .into_iter()
        .filter(|s| s.semester <= SEED_SEMESTERS)
        .collect();
    CurriculumBoard::with_parts(subjects, default_axes(), default_program(), SEED_SEMESTERS)
}

// =============================================================================
// TESTS
// =============================================================================
