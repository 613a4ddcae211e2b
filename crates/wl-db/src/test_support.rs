//! Shared test utilities for wl-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use wl_config::EngineConfig;
    use wl_core::entities::{AcademicGroup, Contract, Staff, StandardLoadDraft, Task, TaskKind};

    use crate::service::WorkloadService;

    /// IDs generated while seeding.
    pub struct SeedIds {
        pub teaching_a: String,
        pub teaching_b: String,
        pub full_time: String,
    }

    /// Create an in-memory WorkloadService with the default engine config.
    pub async fn test_service() -> WorkloadService {
        WorkloadService::new_local(":memory:", EngineConfig::default())
            .await
            .unwrap()
    }

    pub fn draft(year: i32) -> StandardLoadDraft {
        StandardLoadDraft {
            year,
            load_lecture: 3.5,
            load_lecture_first: 6.0,
            load_coursework_set: 0.0,
            load_coursework_credit: 0.0,
            load_coursework_marked: 0.0,
            load_exam_credit: 0.0,
            load_exam_marked: 0.0,
            load_fte_misc: 100.0,
            target_load_per_fte: 1650,
        }
    }

    /// Two full-time staff in group "P", each assigned an 800 hour task
    /// ("aa1" on `teaching_a`, "bb2" on `teaching_b`), plus an unassigned
    /// full-time task.
    pub async fn seeded_service() -> (WorkloadService, SeedIds) {
        let svc = test_service().await;
        svc.create_standard_load(draft(2024)).await.unwrap();
        svc.create_group(&AcademicGroup::new("P", "Phys", "Physics"))
            .await
            .unwrap();

        let mut teaching = Vec::new();
        for account in ["aa1", "bb2"] {
            svc.create_staff(
                &Staff::new(account, account.to_uppercase(), Contract::Fte { fraction: 1.0 }, 2024)
                    .with_group("P"),
            )
            .await
            .unwrap();
            let task = svc
                .create_task(&Task::new("", format!("Teaching {account}")).with_load_fixed(800, 0))
                .await
                .unwrap();
            svc.create_assignment(&task.id, account, None, false)
                .await
                .unwrap();
            teaching.push(task.id);
        }
        let full_time = svc
            .create_task(&Task::new("", "Sabbatical").with_kind(TaskKind::FullTime))
            .await
            .unwrap();

        let teaching_b = teaching.pop().unwrap();
        let teaching_a = teaching.pop().unwrap();
        (
            svc,
            SeedIds {
                teaching_a,
                teaching_b,
                full_time: full_time.id,
            },
        )
    }
}
