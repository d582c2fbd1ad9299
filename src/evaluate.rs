use crate::domain::driftavbrott::Driftavbrott;

/// Per-request decision; the restricting variants carry the window.
#[derive(Debug, Clone)]
pub enum Outcome {
    Pass,
    Block(Driftavbrott),
    Annotate(Driftavbrott),
}

/// Exclusions win over everything, an absent window passes, a present one
/// blocks or annotates by severity. Time bounds are the source's concern.
pub fn evaluate(window: Option<Driftavbrott>, path: Option<&str>, excludes: &[String]) -> Outcome {
    if is_excluded(excludes, path) {
        return Outcome::Pass;
    }

    match window {
        None => Outcome::Pass,
        Some(avbrott) => {
            if avbrott.severity().is_blocking() {
                Outcome::Block(avbrott)
            } else {
                Outcome::Annotate(avbrott)
            }
        }
    }
}

/// True when some configured prefix literally prefixes the path; a missing
/// path never matches.
pub fn is_excluded(excludes: &[String], path: Option<&str>) -> bool {
    let Some(path) = path else {
        return false;
    };
    excludes.iter().any(|exclude| path.starts_with(exclude))
}
