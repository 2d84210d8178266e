use super::{load_student, PlacementService, PlacementServiceError};
use crate::workflows::placement::access::{authorize, Actor};
use crate::workflows::placement::domain::Role;
use crate::workflows::placement::report::{
    admin_dashboard, company_dashboard, compute_analytics, student_dashboard, AdminDashboard,
    CompanyDashboard, PlacementAnalytics, Snapshot, StudentDashboard,
};
use crate::workflows::placement::repository::PlacementStore;

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    pub fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, PlacementServiceError> {
        authorize(actor, Role::Admin, "admin_dashboard")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;
        Ok(admin_dashboard(&snapshot))
    }

    pub fn company_dashboard(
        &self,
        actor: &Actor,
    ) -> Result<CompanyDashboard, PlacementServiceError> {
        authorize(actor, Role::Company, "company_dashboard")?;
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;
        Ok(company_dashboard(&snapshot, actor.account_id))
    }

    pub fn student_dashboard(
        &self,
        actor: &Actor,
    ) -> Result<StudentDashboard, PlacementServiceError> {
        authorize(actor, Role::Student, "student_dashboard")?;
        let today = self.today();

        let (profile, snapshot) = self.store.read(|reader| {
            Ok::<_, PlacementServiceError>((
                load_student(reader, actor.account_id)?,
                Snapshot::load(reader)?,
            ))
        })?;
        Ok(student_dashboard(&snapshot, &profile, today))
    }

    /// Placement-cell analytics over the whole portal.
    pub fn analytics(&self, actor: &Actor) -> Result<PlacementAnalytics, PlacementServiceError> {
        authorize(actor, Role::Admin, "analytics")?;
        let now = self.now();
        let snapshot = self.store.read(|reader| Snapshot::load(reader))?;

        let analytics = compute_analytics(&snapshot, &self.reporting, now);
        tracing::debug!(
            students = analytics.totals.total_students,
            applications = analytics.totals.total_applications,
            "analytics computed"
        );
        Ok(analytics)
    }
}
