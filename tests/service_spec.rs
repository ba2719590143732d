use std::collections::HashSet;
use std::sync::Arc;

use incident_desk::auth::{CallerContext, PermissiveAuthorizer, RoleAuthorizer};
use incident_desk::error::IncidentError;
use incident_desk::models::*;
use incident_desk::notify::{ViewRevisions, INCIDENT_LIST_VIEW};
use incident_desk::service::{IncidentService, ResolvePolicy};
use incident_desk::store::IncidentStore;
use speculate2::speculate;

fn form(pairs: &[(&str, &str)]) -> FormFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

speculate! {
    before {
        let service = IncidentService::in_memory();
        let admin = CallerContext::admin();
    }

    describe "submit_incident" {
        it "creates incidents with unique ids and open status" {
            let created: Vec<Incident> = (0..5)
                .map(|n| {
                    let title = format!("Incident {n}");
                    service
                        .submit_incident(&form(&[("title", title.as_str())]))
                        .expect("Failed to submit")
                })
                .collect();

            let ids: HashSet<u64> = created.iter().map(|i| i.id).collect();
            assert_eq!(ids.len(), 5);
            assert!(created.iter().all(|i| i.status == IncidentStatus::Open));
        }

        it "keeps submission order in get_incidents" {
            for title in ["first", "second", "third"] {
                service.submit_incident(&form(&[("title", title)])).expect("Failed to submit");
            }

            let titles: Vec<String> = service.get_incidents().into_iter().map(|i| i.title).collect();
            assert_eq!(titles, vec!["first", "second", "third"]);
        }

        it "rejects a missing title without growing the store" {
            service.submit_incident(&form(&[("title", "A")])).expect("Failed to submit");

            let err = service
                .submit_incident(&form(&[("description", "no title here")]))
                .unwrap_err();

            assert_eq!(err, IncidentError::Validation { field: "title" });
            assert_eq!(service.get_incidents().len(), 1);
        }

        it "trims fields and keeps optional details" {
            let incident = service
                .submit_incident(&form(&[
                    ("title", " Heating out "),
                    ("description", "Radiators cold since Monday"),
                    ("reporter", "unit 3C"),
                ]))
                .expect("Failed to submit");

            assert_eq!(incident.title, "Heating out");
            assert_eq!(incident.description.as_deref(), Some("Radiators cold since Monday"));
            assert_eq!(incident.reporter.as_deref(), Some("unit 3C"));
        }
    }

    describe "resolve_incident" {
        it "resolves an open incident and leaves others unchanged" {
            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();
            let b = service.submit_incident(&form(&[("title", "B")])).unwrap();

            service.resolve_incident(&admin, a.id).expect("Failed to resolve");

            let incidents = service.get_incidents();
            assert_eq!(incidents[0].status, IncidentStatus::Resolved);
            assert_eq!(incidents[1], b);
        }

        it "is idempotent for an already resolved incident" {
            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();
            service.resolve_incident(&admin, a.id).unwrap();
            let after_first = service.get_incidents();

            service.resolve_incident(&admin, a.id).expect("Second resolve should succeed");

            assert_eq!(service.get_incidents(), after_first);
        }

        it "ignores an unknown id under the default policy" {
            service.submit_incident(&form(&[("title", "A")])).unwrap();
            let before = service.get_incidents();

            service.resolve_incident(&admin, 99).expect("Unknown id should be a no-op");

            assert_eq!(service.get_incidents(), before);
        }

        it "rejects tenants and anonymous callers" {
            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();

            for caller in [CallerContext::tenant(), CallerContext::anonymous()] {
                assert_eq!(
                    service.resolve_incident(&caller, a.id),
                    Err(IncidentError::Unauthorized)
                );
            }
            assert_eq!(service.get_incidents()[0].status, IncidentStatus::Open);
        }

        it "fails on an unknown id under the strict policy" {
            let service = service.with_policy(ResolvePolicy::Strict);
            assert_eq!(
                service.resolve_incident(&admin, 5),
                Err(IncidentError::NotFound(5))
            );
        }
    }

    describe "permissive authorization" {
        it "lets any caller resolve" {
            let service = IncidentService::new(
                IncidentStore::new(),
                Arc::new(PermissiveAuthorizer::new()),
                Arc::new(ViewRevisions::new()),
            );
            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();

            service
                .resolve_incident(&CallerContext::anonymous(), a.id)
                .expect("Permissive gate should allow anonymous callers");

            assert_eq!(service.get_incidents()[0].status, IncidentStatus::Resolved);
        }
    }

    describe "view invalidation" {
        it "bumps the list revision on submit and on every successful resolve" {
            let revisions = ViewRevisions::new();
            let service = IncidentService::new(
                IncidentStore::new(),
                Arc::new(RoleAuthorizer),
                Arc::new(revisions.clone()),
            );

            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();
            assert_eq!(revisions.revision(INCIDENT_LIST_VIEW), 1);

            service.resolve_incident(&admin, a.id).unwrap();
            assert_eq!(revisions.revision(INCIDENT_LIST_VIEW), 2);

            service.resolve_incident(&admin, a.id).unwrap();
            service.resolve_incident(&admin, 42).unwrap();
            assert_eq!(revisions.revision(INCIDENT_LIST_VIEW), 4);

            let _ = service.resolve_incident(&CallerContext::tenant(), a.id);
            assert_eq!(revisions.revision(INCIDENT_LIST_VIEW), 4);
        }
    }

    describe "scenario" {
        it "walks the submit, resolve, repeat, unknown, invalid sequence" {
            let a = service.submit_incident(&form(&[("title", "A")])).unwrap();
            assert_eq!(a.id, 1);
            assert_eq!(a.status, IncidentStatus::Open);
            assert_eq!(a.title, "A");

            service.resolve_incident(&admin, 1).unwrap();
            let resolved = service.get_incidents();
            assert_eq!(resolved.len(), 1);
            assert_eq!(resolved[0].status, IncidentStatus::Resolved);

            service.resolve_incident(&admin, 1).unwrap();
            assert_eq!(service.get_incidents(), resolved);

            service.resolve_incident(&admin, 99).unwrap();
            assert_eq!(service.get_incidents(), resolved);

            let err = service.submit_incident(&form(&[("reporter", "unit 1")])).unwrap_err();
            assert!(matches!(err, IncidentError::Validation { .. }));
            assert_eq!(service.get_incidents().len(), 1);
        }
    }
}
