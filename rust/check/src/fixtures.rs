// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inline STEP models for unit tests.

use ifc_beam_core::IfcModel;

pub const MILLIMETRE_UNITS: &str = "#1=IFCPROJECT('0proj',$,'P',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);";

pub const METRE_UNITS: &str = "#1=IFCPROJECT('0proj',$,'P',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);";

pub const FOOT_UNITS: &str = "#1=IFCPROJECT('0proj',$,'P',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCCONVERSIONBASEDUNIT(#4,.LENGTHUNIT.,'FOOT',#5);";

/// Wrap data lines in a minimal IFC4 file.
pub fn step_file(units: &str, data: &str) -> String {
    format!(
        "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
{}
{}
ENDSEC;
END-ISO-10303-21;
",
        units, data
    )
}

pub fn model(units: &str, data: &str) -> IfcModel {
    IfcModel::from_content(step_file(units, data)).unwrap()
}
