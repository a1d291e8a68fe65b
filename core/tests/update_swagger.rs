use pretty_assertions::assert_eq;
use review_patch_core::document::ApiDocument;
use review_patch_core::mapping::builtin_mappings;
use review_patch_core::patcher::apply_review_mappings;
use std::fs;

const SOURCE_DOC: &str = r#"
swagger: '2.0'
info:
  title: Review Service API
  version: 1.0.0
paths:
  /health:
    get:
      summary: Health check
  /doctors/add-review/{id}:
    post:
      summary: Add Review
      tags:
      - Doctors
"#;

const PATCHED_DOC: &str = r#"
swagger: '2.0'
info:
  title: Review Service API
  version: 1.0.0
paths:
  /health:
    get:
      summary: Health check
  /doctors/{id}/reviews:
    post:
      tags:
      - Doctors
      summary: Add Review to Doctor (Standardized)
      parameters:
      - in: path
        name: id
        required: true
        schema:
          type: string
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              properties:
                rating:
                  type: integer
                  minimum: 1
                  maximum: 5
                comment:
                  type: string
                  maxLength: 1000
                name:
                  type: string
              required:
              - rating
              - comment
      responses:
        '201':
          description: Review created successfully
          content:
            application/json:
              schema:
                type: object
        '400':
          description: Invalid request payload
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/ErrorResponse'
        '401':
          description: Authentication required
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/ErrorResponse'
        '403':
          description: Insufficient permissions
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/ErrorResponse'
        '422':
          description: Validation failed
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/ErrorResponse'
      security:
      - bearerAuth: []
  /doctors/add-review/{id}:
    post:
      summary: Add Review (Legacy - Use /doctors/{id}/reviews)
      tags:
      - Doctors
      deprecated: true
components:
  schemas:
    ErrorResponse:
      type: object
      properties:
        code:
          type: integer
        message:
          type: string
      required:
      - message
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
      bearerFormat: JWT
"#;

#[test]
fn test_patch_doctors_document_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swagger.yaml");
    fs::write(&path, SOURCE_DOC).unwrap();

    let mut document = ApiDocument::load(&path).unwrap();
    let report = apply_review_mappings(&mut document, &builtin_mappings()).unwrap();
    document.save(&path).unwrap();

    let lines: Vec<String> = report.outcomes().iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "⚠️  Could not find /businesses/add-review/{id}",
            "⚠️  Could not find /restaurants/add-review/{id}",
            "✅ Added /doctors/{id}/reviews POST operation",
            "⚠️  Could not find /markets/add-review/{id}",
            "⚠️  Could not find /recipes/add-review/{id}",
            "⚠️  Could not find /sanctuaries/add-review/{id}",
            "⚠️  Could not find /professions/add-review/{id}",
        ]
    );

    let patched = fs::read_to_string(&path).unwrap();
    assert_eq!(patched.trim(), PATCHED_DOC.trim());
}

#[test]
fn test_second_run_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swagger.yaml");
    fs::write(&path, SOURCE_DOC).unwrap();

    let mut document = ApiDocument::load(&path).unwrap();
    apply_review_mappings(&mut document, &builtin_mappings()).unwrap();
    document.save(&path).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let mut document = ApiDocument::load(&path).unwrap();
    let report = apply_review_mappings(&mut document, &builtin_mappings()).unwrap();

    assert_eq!(report.added(), 0);
    assert!(!report.changed());
    assert_eq!(
        report.outcomes()[2].to_string(),
        "ℹ️  /doctors/{id}/reviews already exists, skipping"
    );

    document.save(&path).unwrap();
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(second, first);
}
