///
/// PathSegment
///
/// One step of the field path threaded through the decode walk. Fields
/// dot-join; list indices render as `[i]` with no separator.
///

#[derive(Clone, Debug)]
pub(crate) enum PathSegment {
    Field(String),
    Index(usize),
}

pub(crate) fn render_path(path: &[PathSegment]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let mut first = true;

    for seg in path {
        match seg {
            PathSegment::Field(s) => {
                if !first {
                    out.push('.');
                }
                out.push_str(s);
            }
            PathSegment::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
        }
        first = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_dot_join_and_indices_attach() {
        let path = [
            PathSegment::Field("address".into()),
            PathSegment::Field("tags".into()),
            PathSegment::Index(2),
            PathSegment::Field("city".into()),
        ];
        assert_eq!(render_path(&path), "address.tags[2].city");
        assert_eq!(render_path(&[]), "");
    }
}
