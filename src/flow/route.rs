use std::fmt;
use std::str::FromStr;

use crate::error::StudyError;
use crate::store::RunId;

/// Addressable pages, printable as and parseable from their paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Start,
    Calibration,
    Auth,
    TestList,
    TestDetail(RunId),
    EnterName,
    TaskHub { is_first_task: bool },
    Task1 { is_first_task: bool },
    Task2 { is_first_task: bool },
    Final,
    Results,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Start => write!(f, "/"),
            Route::Calibration => write!(f, "/calibration"),
            Route::Auth => write!(f, "/auth"),
            Route::TestList => write!(f, "/list"),
            Route::TestDetail(id) => write!(f, "/testInfo/{}", id),
            Route::EnterName => write!(f, "/enterName"),
            Route::TaskHub { is_first_task } => write!(f, "/tasks/{}", is_first_task),
            Route::Task1 { is_first_task } => write!(f, "/tasks/{}/task1", is_first_task),
            Route::Task2 { is_first_task } => write!(f, "/tasks/{}/task2", is_first_task),
            Route::Final => write!(f, "/end"),
            Route::Results => write!(f, "/results"),
        }
    }
}

impl FromStr for Route {
    type Err = StudyError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || StudyError::UnknownRoute(path.to_string());
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Start,
            ["calibration"] => Route::Calibration,
            ["auth"] => Route::Auth,
            ["list"] => Route::TestList,
            ["testInfo", id] => Route::TestDetail(RunId(id.parse().map_err(|_| unknown())?)),
            ["enterName"] => Route::EnterName,
            ["tasks", flag] => Route::TaskHub {
                is_first_task: flag.parse().map_err(|_| unknown())?,
            },
            ["tasks", flag, "task1"] => Route::Task1 {
                is_first_task: flag.parse().map_err(|_| unknown())?,
            },
            ["tasks", flag, "task2"] => Route::Task2 {
                is_first_task: flag.parse().map_err(|_| unknown())?,
            },
            ["end"] => Route::Final,
            ["results"] => Route::Results,
            _ => return Err(unknown()),
        };
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_paths_print_and_parse_back() {
        let routes = [
            Route::Start,
            Route::Calibration,
            Route::Auth,
            Route::TestList,
            Route::TestDetail(RunId(12)),
            Route::EnterName,
            Route::TaskHub { is_first_task: true },
            Route::Task1 { is_first_task: true },
            Route::Task2 { is_first_task: false },
            Route::Final,
            Route::Results,
        ];
        for route in routes {
            assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
        }
    }

    #[test]
    fn test_known_paths() {
        assert_eq!("/tasks/false".parse::<Route>().unwrap(), Route::TaskHub { is_first_task: false });
        assert_eq!("/end/".parse::<Route>().unwrap(), Route::Final);
        assert_eq!(Route::TestDetail(RunId(3)).to_string(), "/testInfo/3");
    }

    #[test]
    fn test_unknown_paths_rejected() {
        assert_matches!("/nowhere".parse::<Route>(), Err(StudyError::UnknownRoute(_)));
        assert_matches!("/tasks/maybe".parse::<Route>(), Err(StudyError::UnknownRoute(_)));
        assert_matches!("/testInfo/x".parse::<Route>(), Err(StudyError::UnknownRoute(_)));
    }
}
